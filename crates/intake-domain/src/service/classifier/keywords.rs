//! Keyword tables matched (lower-cased, substring) against annotation text

use intake_types::IncidentType;

pub const COLLISION_LABELS: &[&str] = &[
    "traffic collision",
    "accident",
    "crash",
    "collision",
    "car accident",
    "vehicle accident",
];

/// Object names counted as vehicles (exact match)
pub const VEHICLE_OBJECTS: &[&str] = &["car", "vehicle"];

/// Object names that anchor a fluid leak to a vehicle (exact match)
pub const FLUID_ANCHOR_OBJECTS: &[&str] = &["car", "vehicle", "tire", "wheel"];

pub const FLUID_LABELS: &[&str] = &[
    "liquid", "oil", "fluid", "leak", "spill", "puddle", "water", "stain", "wet", "drip", "drop",
];

pub const ACCESS_LABELS: &[&str] = &[
    "key",
    "lock",
    "door",
    "car door",
    "handle",
    "vehicle door",
    "automobile door",
    "car key",
    "person",
];

pub const TIRE_LABELS: &[&str] = &[
    "tire",
    "wheel",
    "flat tire",
    "puncture",
    "tyre",
    "rim",
    "automotive wheel",
];

pub const FLAT_TIRE_LABELS: &[&str] = &["flat", "puncture", "deflated"];

pub const BATTERY_LABELS: &[&str] = &[
    "battery",
    "car battery",
    "vehicle battery",
    "automotive battery",
    "power source",
];

pub const DASHBOARD_TEXT: &[&str] = &[
    "mph",
    "km/h",
    "rpm",
    "fuel",
    "battery",
    "temperature",
    "oil",
    "check engine",
];

pub const BATTERY_TEXT: &[&str] = &["battery", "bat", "charge", "electrical", "power", "voltage"];

/// A dashboard line reading exactly this is taken as a battery warning
pub const BATTERY_WARNING_LINE: &str = "140";

/// Free-text scan, first match in declaration order wins
pub const TEXT_KEYWORDS: &[(&str, IncidentType)] = &[
    ("battery", IncidentType::Battery),
    ("check engine", IncidentType::Engine),
    ("oil", IncidentType::Oil),
    ("temperature", IncidentType::Temperature),
    ("flat tire", IncidentType::FlatTire),
    ("puncture", IncidentType::FlatTire),
    ("fuel", IncidentType::Fuel),
    ("key", IncidentType::AccessKeys),
    ("lock", IncidentType::AccessLock),
    ("door", IncidentType::AccessDoor),
    ("leak", IncidentType::FluidLeak),
    ("fluid", IncidentType::FluidLeak),
];

/// Label keyword to vehicle type; the last matching label wins
pub const VEHICLE_TYPES: &[(&str, &str)] = &[
    ("car", "car"),
    ("automobile", "car"),
    ("vehicle", "car"),
    ("truck", "truck"),
    ("motorcycle", "motorcycle"),
    ("bike", "motorcycle"),
    ("bicycle", "bicycle"),
    ("bus", "bus"),
    ("van", "van"),
    ("suv", "suv"),
];

/// Object name keyword to implicated part
pub const OBJECT_PARTS: &[(&str, &str)] = &[
    ("tire", parts::TIRE),
    ("wheel", parts::TIRE),
    ("car", parts::BODY),
    ("vehicle", parts::BODY),
    ("door", "door"),
    ("window", "window"),
    ("windshield", "windshield"),
    ("headlight", "front headlight"),
    ("taillight", "rear light"),
    ("bumper", parts::BUMPER),
    ("hood", "hood"),
    ("trunk", "trunk"),
    ("mirror", "mirror"),
    ("person", "personal assistance"),
];

/// Damaged part names
pub mod parts {
    pub const BODY: &str = "body";
    pub const BUMPER: &str = "bumper";
    pub const HEADLIGHTS: &str = "headlights";
    pub const FLUID_SYSTEM: &str = "fluid system";
    pub const POSSIBLE_LEAK: &str = "possible oil/coolant leak";
    pub const ACCESS_SYSTEM: &str = "access system";
    pub const LOCK: &str = "lock";
    pub const BATTERY: &str = "battery";
    pub const ELECTRICAL_SYSTEM: &str = "electrical system";
    pub const TIRE: &str = "tire";
    pub const WHEEL: &str = "wheel";
    pub const DASHBOARD: &str = "dashboard";
    pub const ENGINE: &str = "engine";
    pub const LUBRICATION_SYSTEM: &str = "lubrication system";
    pub const COOLING_SYSTEM: &str = "cooling system";
    pub const FUEL_SYSTEM: &str = "fuel system";

    pub const COLLISION: &[&str] = &[BODY, BUMPER, HEADLIGHTS];
    pub const FLUID_LEAK: &[&str] = &[FLUID_SYSTEM, POSSIBLE_LEAK];
    pub const ACCESS: &[&str] = &[ACCESS_SYSTEM, LOCK];
    pub const BATTERY_FAILURE: &[&str] = &[BATTERY, ELECTRICAL_SYSTEM];
    pub const TIRE_FAILURE: &[&str] = &[TIRE, WHEEL];
}

/// Parts a free-text keyword match implicates
pub fn parts_for(incident: IncidentType) -> &'static [&'static str] {
    match incident {
        IncidentType::Battery => &[parts::BATTERY],
        IncidentType::Engine => &[parts::ENGINE],
        IncidentType::Oil => &[parts::LUBRICATION_SYSTEM],
        IncidentType::Temperature => &[parts::COOLING_SYSTEM],
        IncidentType::FlatTire | IncidentType::TireProblem => &[parts::TIRE],
        IncidentType::Fuel => &[parts::FUEL_SYSTEM],
        IncidentType::FluidLeak => parts::FLUID_LEAK,
        IncidentType::Dashboard => &[parts::DASHBOARD],
        t if t.is_access() => parts::ACCESS,
        _ => &[],
    }
}

pub fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}
