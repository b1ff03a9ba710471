/// Logical receiver channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    /// Two position switch (CH5 / AUX1), drives the power LED.
    Power,
    /// Throttle stick (CH3), drives the hue of the RGB LED.
    Color,
    /// Elevator stick (CH2), drives the brightness LED.
    Brightness,
}

impl ChannelId {
    /// Service order of the main loop.
    pub const ALL: [ChannelId; 3] = [ChannelId::Power, ChannelId::Color, ChannelId::Brightness];

    pub const fn label(self) -> &'static str {
        match self {
            ChannelId::Power => "Power",
            ChannelId::Color => "Color",
            ChannelId::Brightness => "Bright",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_matches_index() {
        for (i, id) in ChannelId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn labels() {
        assert_eq!(ChannelId::Power.label(), "Power");
        assert_eq!(ChannelId::Color.label(), "Color");
        assert_eq!(ChannelId::Brightness.label(), "Bright");
    }
}
