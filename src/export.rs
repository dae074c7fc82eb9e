use std::io::Write;

use strum::IntoEnumIterator;

use crate::error::BingoError;
use crate::statistics::{PatternStats, StatsAggregator};
use crate::types::RollUp;

/// Column names shared by both tables, after their leading column.
fn stat_headers(stats: &StatsAggregator) -> Vec<String> {
    let mut headers: Vec<String> = stats.patterns().into_iter().map(|p| p.key()).collect();
    headers.extend(RollUp::iter().map(|r| r.to_string()));
    headers
}

fn stat_columns(stats: &StatsAggregator) -> Vec<&PatternStats> {
    let mut columns: Vec<&PatternStats> = stats.patterns().into_iter().map(|p| stats.pattern(p)).collect();
    columns.extend(RollUp::iter().map(|r| stats.roll_up(r)));
    columns
}

/// Write the try histograms: one row per ball count, one column per pattern and roll-up.
pub fn write_tries_csv<W: Write>(stats: &StatsAggregator, writer: W) -> Result<(), BingoError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["balls".to_string(), "total".to_string()];
    header.extend(stat_headers(stats));
    csv_writer.write_record(&header)?;

    let columns = stat_columns(stats);
    for balls in 0..stats.total_tries().len() {
        let mut record = vec![balls.to_string(), stats.total_tries()[balls].to_string()];
        record.extend(columns.iter().map(|c| c.tries[balls].to_string()));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the win counts as a single row under a header.
pub fn write_wins_csv<W: Write>(stats: &StatsAggregator, writer: W) -> Result<(), BingoError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["games".to_string()];
    header.extend(stat_headers(stats));
    csv_writer.write_record(&header)?;

    let mut record = vec![stats.games_played().to_string()];
    record.extend(stat_columns(stats).iter().map(|c| c.wins.to_string()));
    csv_writer.write_record(&record)?;

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
