use tvscan_core::columns;

use super::CommandOutput;

pub fn run() -> CommandOutput {
    CommandOutput::Columns(
        columns::ALL
            .iter()
            .map(|(label, column)| (*label, column.name().to_owned()))
            .collect(),
    )
}
