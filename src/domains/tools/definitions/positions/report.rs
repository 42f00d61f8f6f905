//! Positions report rendering.

use std::fmt;

use super::format::{format_money, format_percent, format_quantity};
use super::model::{Amount, MISSING_TEXT, PositionRecord};

/// Result of a positions query that reached the backend successfully.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionsOutcome {
    /// The backend reported zero positions for the symbol.
    Empty { symbol: String },

    /// At least one position to report.
    Report(PositionsReport),
}

impl fmt::Display for PositionsOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { symbol } => write!(f, "No positions found for symbol: {}", symbol),
            Self::Report(report) => fmt::Display::fmt(report, f),
        }
    }
}

/// Sums over every position in a report.
///
/// Integer wire values are summed exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub quantity: Amount,
    pub market_value: Amount,
    pub unrealized_pnl: Amount,
}

impl Totals {
    pub fn from_records(records: &[PositionRecord]) -> Self {
        records.iter().fold(Self::default(), |acc, record| Self {
            quantity: acc.quantity + record.position.quantity(),
            market_value: acc.market_value + record.position.market_value(),
            unrealized_pnl: acc.unrealized_pnl + record.position.unrealized_pnl(),
        })
    }
}

/// Human-readable positions summary with an embedded raw JSON block.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionsReport {
    symbol: String,
    count: u64,
    records: Vec<PositionRecord>,
    totals: Totals,
    raw_json: String,
}

impl PositionsReport {
    /// Build a report over `records`, in the order the backend sent them.
    ///
    /// `count` is the count reported by the backend and only appears in the
    /// header line.
    pub fn new(
        symbol: impl Into<String>,
        count: u64,
        records: Vec<PositionRecord>,
    ) -> Result<Self, serde_json::Error> {
        let raw_json = serde_json::to_string_pretty(&records)?;
        let totals = Totals::from_records(&records);

        Ok(Self {
            symbol: symbol.into(),
            count,
            records,
            totals,
            raw_json,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn records(&self) -> &[PositionRecord] {
        &self.records
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Pretty-printed JSON of the positions exactly as received.
    pub fn raw_json(&self) -> &str {
        &self.raw_json
    }

    fn write_position(
        f: &mut fmt::Formatter<'_>,
        index: usize,
        record: &PositionRecord,
    ) -> fmt::Result {
        let pos = &record.position;
        let pnl_percent = pos
            .pnl_percent()
            .map(format_percent)
            .unwrap_or_else(|| MISSING_TEXT.to_string());

        writeln!(f, "Position {}:", index)?;
        writeln!(f, "  Account: {}", pos.legal_entity())?;
        writeln!(f, "  Quantity: {} shares", format_quantity(pos.quantity()))?;
        writeln!(f, "  Market Value: {}", format_money(pos.market_value()))?;
        writeln!(f, "  Current Price: {}", format_money(pos.current_price()))?;
        writeln!(f, "  Avg Cost: {}", format_money(pos.average_price()))?;
        writeln!(f, "  Unrealized P&L: {}", format_money(pos.unrealized_pnl()))?;
        writeln!(f, "  P&L %: {}", pnl_percent)?;
        writeln!(f)
    }
}

impl fmt::Display for PositionsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Found {} position(s) for {}:\n\n", self.count, self.symbol)?;

        for (i, record) in self.records.iter().enumerate() {
            Self::write_position(f, i + 1, record)?;
        }

        writeln!(f, "Total Summary:")?;
        writeln!(f, "  Total Shares: {}", format_quantity(self.totals.quantity))?;
        writeln!(
            f,
            "  Total Market Value: {}",
            format_money(self.totals.market_value)
        )?;
        writeln!(
            f,
            "  Total Unrealized P&L: {}",
            format_money(self.totals.unrealized_pnl)
        )?;

        write!(f, "\nRaw Data (JSON):\n```json\n{}\n```", self.raw_json)
    }
}
