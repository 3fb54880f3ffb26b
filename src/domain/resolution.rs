/// HydroSHEDS grid resolution the delineation runs on, in arc-seconds
/// per cell. Finer cells trace tighter boundaries but cover a smaller
/// window around the outlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    Fifteen,
    #[default]
    Thirty,
}

impl Resolution {
    pub fn from_arc_seconds(value: u16) -> Option<Self> {
        match value {
            15 => Some(Resolution::Fifteen),
            30 => Some(Resolution::Thirty),
            _ => None,
        }
    }

    pub fn arc_seconds(self) -> u16 {
        match self {
            Resolution::Fifteen => 15,
            Resolution::Thirty => 30,
        }
    }

    /// Earth Engine asset id of the matching flow-accumulation grid.
    pub fn dataset(self) -> String {
        format!("WWF/HydroSHEDS/{}ACC", self.arc_seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_published_grids_are_accepted() {
        assert_eq!(Resolution::from_arc_seconds(15), Some(Resolution::Fifteen));
        assert_eq!(Resolution::from_arc_seconds(30), Some(Resolution::Thirty));
        assert_eq!(Resolution::from_arc_seconds(3), None);
        assert_eq!(Resolution::from_arc_seconds(0), None);
    }

    #[test]
    fn test_dataset_ids() {
        assert_eq!(Resolution::Fifteen.dataset(), "WWF/HydroSHEDS/15ACC");
        assert_eq!(Resolution::Thirty.dataset(), "WWF/HydroSHEDS/30ACC");
        assert_eq!(Resolution::default(), Resolution::Thirty);
    }
}
