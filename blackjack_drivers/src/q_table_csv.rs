use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use blackjack::q_learning::{ActionValues, QTable};
use blackjack::QState;

const HEADER: &str = "pv,dv,hard,policy,stand,hit,split,double";

/// Writes one row per learned state, ordered by player total. `policy` lists the
/// three best actions joined with `-`, and `split` is empty where it is not
/// tracked.
pub fn write_q_table<W: Write>(table: &QTable, mut writer: W) -> anyhow::Result<()> {
    let mut rows: Vec<(&QState, &ActionValues)> = table.iter().collect();
    rows.sort_by_key(|(state, _)| (state.player_value, state.dealer_value, !state.hard));

    writeln!(writer, "{}", HEADER)?;
    for (state, values) in rows {
        let policy = values
            .ranked()
            .iter()
            .take(3)
            .map(|(action, _)| action.to_string())
            .collect::<Vec<_>>()
            .join("-");
        let split = values.split.map(|v| v.to_string()).unwrap_or_default();
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{}",
            state.player_value,
            state.dealer_value,
            state.hard,
            policy,
            values.stand,
            values.hit,
            split,
            values.double
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_q_table_file(table: &QTable, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create Q-table file {}", path.display()))?;
    write_q_table(table, BufWriter::new(file))
        .with_context(|| format!("cannot write Q-table file {}", path.display()))
}
