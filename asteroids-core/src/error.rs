use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCode {
    GlobalShipsLeftRange,
    GlobalHighScore,
    GlobalNextShipScore,
    GlobalNextUfoScore,
    ShipBounds,
    ShipAngleRange,
    ShipHyperRange,
    ShipRespawnRange,
    BulletState,
    AsteroidCounter,
    AsteroidState,
    AsteroidWavePause,
    SaucerState,
    MissileState,
    DebrisState,
    PolygonShape,
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GlobalShipsLeftRange => write!(f, "GLOBAL_SHIPS_LEFT_RANGE"),
            Self::GlobalHighScore => write!(f, "GLOBAL_HIGH_SCORE"),
            Self::GlobalNextShipScore => write!(f, "GLOBAL_NEXT_SHIP_SCORE"),
            Self::GlobalNextUfoScore => write!(f, "GLOBAL_NEXT_UFO_SCORE"),
            Self::ShipBounds => write!(f, "SHIP_BOUNDS"),
            Self::ShipAngleRange => write!(f, "SHIP_ANGLE_RANGE"),
            Self::ShipHyperRange => write!(f, "SHIP_HYPER_RANGE"),
            Self::ShipRespawnRange => write!(f, "SHIP_RESPAWN_RANGE"),
            Self::BulletState => write!(f, "BULLET_STATE"),
            Self::AsteroidCounter => write!(f, "ASTEROID_COUNTER"),
            Self::AsteroidState => write!(f, "ASTEROID_STATE"),
            Self::AsteroidWavePause => write!(f, "ASTEROID_WAVE_PAUSE"),
            Self::SaucerState => write!(f, "SAUCER_STATE"),
            Self::MissileState => write!(f, "MISSILE_STATE"),
            Self::DebrisState => write!(f, "DEBRIS_STATE"),
            Self::PolygonShape => write!(f, "POLYGON_SHAPE"),
        }
    }
}

impl std::error::Error for RuleCode {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    NonPositiveDimension { width: i32, height: i32 },
    OddDimension { width: i32, height: i32 },
    DimensionTooLarge { width: i32, height: i32, max: i32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveDimension { width, height } => {
                write!(f, "field size must be positive: got {width}x{height}")
            }
            Self::OddDimension { width, height } => write!(
                f,
                "field size must be even on both axes: got {width}x{height}"
            ),
            Self::DimensionTooLarge { width, height, max } => write!(
                f,
                "field size too large: got {width}x{height}, max {max} per axis"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
