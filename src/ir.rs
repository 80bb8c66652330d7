use serde::{Deserialize, Serialize};

/// Preferred placement of a chip relative to the date grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
        }
    }
}

/// One annotation attached to a day of the displayed month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSignal {
    pub day: i32,
    #[serde(alias = "name")]
    pub label: String,
    #[serde(alias = "price")]
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(default)]
    pub bias_x: f32,
    #[serde(default)]
    pub bias_y: f32,
}

impl CalendarSignal {
    pub fn new(day: i32, label: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            day,
            label: label.into(),
            amount: amount.into(),
            icon: None,
            tone: None,
            side: None,
            bias_x: 0.0,
            bias_y: 0.0,
        }
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    pub fn with_bias(mut self, bias_x: f32, bias_y: f32) -> Self {
        self.bias_x = bias_x;
        self.bias_y = bias_y;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalMonth {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub signals: Vec<CalendarSignal>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignalDocument {
    pub months: Vec<SignalMonth>,
}

impl SignalDocument {
    pub fn single(signals: Vec<CalendarSignal>) -> Self {
        Self {
            months: vec![SignalMonth {
                name: None,
                signals,
            }],
        }
    }

    /// Looks a month up by name, case-insensitively.
    pub fn month(&self, name: &str) -> Option<&SignalMonth> {
        self.months.iter().find(|month| {
            month
                .name
                .as_deref()
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
        })
    }

    pub fn first(&self) -> Option<&SignalMonth> {
        self.months.first()
    }
}
