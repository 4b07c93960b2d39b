//! Bengaluru landmarks for realistic complaint sites.
//!
//! Coordinates taken from OpenStreetMap, rounded to four decimals.

#![allow(dead_code)]

use complaint_router::model::Location;

/// A named site with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Site {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Site {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn location(&self) -> Location {
        Location {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// Worker depot: the ward office next to Vidhana Soudha.
pub const DEPOT: Site = Site::new("Ward Office", 12.9716, 77.5946);

// ============================================================================
// Central wards
// ============================================================================

pub const MAJESTIC: Site = Site::new("Majestic Bus Stand", 12.9767, 77.5713);
pub const KR_MARKET: Site = Site::new("KR Market", 12.9634, 77.5775);
pub const LALBAGH: Site = Site::new("Lalbagh West Gate", 12.9507, 77.5848);
pub const CUBBON_PARK: Site = Site::new("Cubbon Park", 12.9763, 77.5929);
pub const MG_ROAD: Site = Site::new("MG Road Metro", 12.9755, 77.6068);

// ============================================================================
// Outer wards
// ============================================================================

pub const INDIRANAGAR: Site = Site::new("Indiranagar 100ft Road", 12.9719, 77.6412);
pub const KORAMANGALA: Site = Site::new("Koramangala Forum", 12.9346, 77.6113);
pub const JAYANAGAR: Site = Site::new("Jayanagar 4th Block", 12.9250, 77.5838);
pub const MALLESHWARAM: Site = Site::new("Malleshwaram 8th Cross", 13.0031, 77.5643);
pub const YESHWANTHPUR: Site = Site::new("Yeshwanthpur Market", 13.0230, 77.5500);
pub const WHITEFIELD: Site = Site::new("Whitefield ITPL", 12.9857, 77.7362);
pub const ELECTRONIC_CITY: Site = Site::new("Electronic City", 12.8452, 77.6602);
pub const HEBBAL: Site = Site::new("Hebbal Flyover", 13.0358, 77.5970);
pub const BANASHANKARI: Site = Site::new("Banashankari Temple", 12.9155, 77.5733);

pub const ALL_SITES: &[Site] = &[
    MAJESTIC,
    KR_MARKET,
    LALBAGH,
    CUBBON_PARK,
    MG_ROAD,
    INDIRANAGAR,
    KORAMANGALA,
    JAYANAGAR,
    MALLESHWARAM,
    YESHWANTHPUR,
    WHITEFIELD,
    ELECTRONIC_CITY,
    HEBBAL,
    BANASHANKARI,
];
