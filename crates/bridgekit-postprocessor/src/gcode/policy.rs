//! Feed rate and flow rules for bridge moves
//!
//! Resolved once from [`BridgeSettings`]. When both the literal and the
//! multiplying rule of a pair are enabled, the multiplying rule wins.

use bridgekit_settings::BridgeSettings;

/// Decimal places of a rewritten extrusion value
pub const EXTRUSION_PRECISION: usize = 5;

/// How the feed rate of a bridge move is chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedRule {
    /// Leave the original F word untouched
    Keep,
    /// Use this feed rate
    Set(u32),
    /// Multiply the original feed rate by this fraction
    Scale(f64),
}

/// How the extrusion of a bridge move is chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlowRule {
    /// Use this extrusion amount
    Set(f64),
    /// Multiply the extrusion delta since the previous move by this fraction
    ScaleDelta(f64),
}

/// Combined speed and flow rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewritePolicy {
    pub speed: SpeedRule,
    pub flow: FlowRule,
}

impl RewritePolicy {
    /// Resolve the rules from settings
    pub fn from_settings(settings: &BridgeSettings) -> Self {
        let speed = if settings.mul_speed {
            SpeedRule::Scale(settings.mul_speed_fraction())
        } else if settings.set_speed {
            SpeedRule::Set(settings.new_speed)
        } else {
            SpeedRule::Keep
        };

        let flow = if settings.mul_flow {
            FlowRule::ScaleDelta(settings.mul_flow_fraction())
        } else if settings.set_flow {
            FlowRule::Set(settings.new_flow)
        } else {
            // Flow is always rewritten: fall back to the unscaled delta.
            FlowRule::ScaleDelta(1.0)
        };

        Self { speed, flow }
    }

    /// New feed rate, or `None` to keep the original word
    pub fn feed_rate(&self, old_feed: f64) -> Option<f64> {
        match self.speed {
            SpeedRule::Keep => None,
            SpeedRule::Set(feed) => Some(f64::from(feed)),
            SpeedRule::Scale(k) => Some(old_feed * k),
        }
    }

    /// New extrusion amount for a move ending at `old_e`
    pub fn extrusion(&self, old_e: f64, previous_e: f64) -> f64 {
        match self.flow {
            FlowRule::Set(amount) => amount,
            FlowRule::ScaleDelta(k) => (old_e - previous_e) * k,
        }
    }

    /// F word number for the rewritten move, or `None` to keep the original
    pub fn feed_text(&self, old_feed: f64) -> Option<String> {
        self.feed_rate(old_feed).map(|feed| format!("{:.0}", feed))
    }

    /// E word number for the rewritten move
    pub fn extrusion_text(&self, old_e: f64, previous_e: f64) -> String {
        format!(
            "{:.*}",
            EXTRUSION_PRECISION,
            self.extrusion(old_e, previous_e)
        )
    }
}
