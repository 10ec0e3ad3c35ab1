//! Costing models
//!
//! A costing model is a travel-mode profile. On the wire it is split over
//! two fields: `costing` names the model and `costing_options.<model>`
//! carries its tuning parameters. [`Costing`] keeps the two together so a
//! request can never pair one model's name with another model's options.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Driving options shared by `auto`, `bus` and `taxi`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoCostingOptions {
    /// Preference for highways, 0 (avoid) to 1 (prefer)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_highways: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_tolls: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_ferry: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_living_streets: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_tracks: Option<f64>,
    /// Seconds added to every maneuver
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maneuver_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toll_booth_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_crossing_cost: Option<f64>,
    /// Top speed in km/h
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_speed: Option<f64>,
    /// Minimize distance instead of time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortest: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_closures: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_unpaved: Option<bool>,
}

/// Truck dimensions and preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TruckCostingOptions {
    #[serde(flatten)]
    pub auto: AutoCostingOptions,
    /// Height in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Width in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Length in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    /// Weight in metric tons
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Axle load in metric tons
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axle_load: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hazmat: Option<bool>,
}

/// Kind of bicycle, which sets default speeds and road preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BicycleType {
    Road,
    Hybrid,
    Cross,
    Mountain,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BicycleCostingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bicycle_type: Option<BicycleType>,
    /// Average cycling speed in km/h
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycling_speed: Option<f64>,
    /// Willingness to share roads with cars, 0 to 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_roads: Option<f64>,
    /// Willingness to climb, 0 to 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_hills: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_ferry: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_living_streets: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_bad_surfaces: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorScooterCostingOptions {
    /// Top speed in km/h
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_primary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_hills: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_ferry: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PedestrianCostingOptions {
    /// Walking speed in km/h
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walking_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walkway_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidewalk_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_hills: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_ferry: Option<f64>,
    /// Highest SAC scale hiking difficulty allowed, 0 to 6
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hiking_difficulty: Option<u8>,
}

/// Travel mode plus its tuning parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Costing {
    Auto(AutoCostingOptions),
    Bus(AutoCostingOptions),
    Taxi(AutoCostingOptions),
    Truck(TruckCostingOptions),
    Bicycle(BicycleCostingOptions),
    MotorScooter(MotorScooterCostingOptions),
    Pedestrian(PedestrianCostingOptions),
}

impl Costing {
    #[must_use]
    pub fn auto() -> Self {
        Self::Auto(AutoCostingOptions::default())
    }

    #[must_use]
    pub fn truck() -> Self {
        Self::Truck(TruckCostingOptions::default())
    }

    #[must_use]
    pub fn bicycle() -> Self {
        Self::Bicycle(BicycleCostingOptions::default())
    }

    #[must_use]
    pub fn motor_scooter() -> Self {
        Self::MotorScooter(MotorScooterCostingOptions::default())
    }

    #[must_use]
    pub fn pedestrian() -> Self {
        Self::Pedestrian(PedestrianCostingOptions::default())
    }

    /// Wire name of the model
    #[must_use]
    pub const fn model(&self) -> &'static str {
        match self {
            Self::Auto(_) => "auto",
            Self::Bus(_) => "bus",
            Self::Taxi(_) => "taxi",
            Self::Truck(_) => "truck",
            Self::Bicycle(_) => "bicycle",
            Self::MotorScooter(_) => "motor_scooter",
            Self::Pedestrian(_) => "pedestrian",
        }
    }

    fn has_options(&self) -> bool {
        match self {
            Self::Auto(o) | Self::Bus(o) | Self::Taxi(o) => *o != AutoCostingOptions::default(),
            Self::Truck(o) => *o != TruckCostingOptions::default(),
            Self::Bicycle(o) => *o != BicycleCostingOptions::default(),
            Self::MotorScooter(o) => *o != MotorScooterCostingOptions::default(),
            Self::Pedestrian(o) => *o != PedestrianCostingOptions::default(),
        }
    }
}

impl Default for Costing {
    fn default() -> Self {
        Self::auto()
    }
}

/// `{"<model>": options}`
struct OptionsByModel<'a>(&'a Costing);

impl Serialize for OptionsByModel<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        let model = self.0.model();
        match self.0 {
            Costing::Auto(o) | Costing::Bus(o) | Costing::Taxi(o) => map.serialize_entry(model, o)?,
            Costing::Truck(o) => map.serialize_entry(model, o)?,
            Costing::Bicycle(o) => map.serialize_entry(model, o)?,
            Costing::MotorScooter(o) => map.serialize_entry(model, o)?,
            Costing::Pedestrian(o) => map.serialize_entry(model, o)?,
        }
        map.end()
    }
}

/// Serializes as `costing` plus, when any option is set, `costing_options`
///
/// Meant to be `#[serde(flatten)]`ed into a request body.
impl Serialize for Costing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let with_options = self.has_options();
        let mut map = serializer.serialize_map(Some(if with_options { 2 } else { 1 }))?;
        map.serialize_entry("costing", self.model())?;
        if with_options {
            map.serialize_entry("costing_options", &OptionsByModel(self))?;
        }
        map.end()
    }
}
