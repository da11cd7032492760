//! Built-in reference dataset
//!
//! Recovery-duration quantiles (days) for two historical downturns. Used when
//! no configuration file supplies its own `cases`.

use crate::error::Result;
use crate::quantile::QuantileLevel;
use crate::table::{EventCase, QuantileTable};
use crate::weather::WeatherState;

pub const GLOBAL_FINANCIAL_CRISIS: &str = "2008 Global Financial Crisis";
pub const COVID_SHOCK: &str = "2020 COVID Shock";

/// Build the reference quantile table
pub fn reference_table() -> Result<QuantileTable> {
    QuantileTable::new([
        (
            GLOBAL_FINANCIAL_CRISIS.to_string(),
            EventCase::new(
                WeatherState::Typhoon,
                "Collapse of the financial system kept recovery odds low for an extended period",
                [
                    (QuantileLevel::P20, 120.0),
                    (QuantileLevel::P50, 198.0),
                    (QuantileLevel::P80, 320.0),
                ],
            )?,
        ),
        (
            COVID_SHOCK.to_string(),
            EventCase::new(
                WeatherState::Shower,
                "Policy response brought recovery odds back to normal quickly",
                [
                    (QuantileLevel::P20, 35.0),
                    (QuantileLevel::P50, 63.0),
                    (QuantileLevel::P80, 110.0),
                ],
            )?,
        ),
    ])
}
