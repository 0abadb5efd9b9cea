/// The equipment store inspected when no `--database` is given.
pub const DEFAULT_DATABASE_PATH: &str = "../DB3K_513-精简.db3";

/// The tables sampled by default, in sampling (and reporting) order.
pub const DEFAULT_TABLES: &[&str] = &[
    "DataAircraft",
    "DataShip",
    "DataSubmarine",
    "DataFacility",
    "DataGroundUnit",
    "DataSatelite",
    "DataWeapon",
    "DataSensor",
    "DataMount",
    "DataLoadout",
    "DataComm",
    "DataMagazine",
    "DataWarhead",
    "DataPropulsion",
];

/// The maximum number of rows sampled from each table.
pub const DEFAULT_SAMPLE_SIZE: usize = 30;

/// The only table whose names are checked for hull-number style designations.
pub const SHIP_TABLE: &str = "DataShip";

/// The column holding the equipment name.
pub const NAME_COLUMN: &str = "Name";

/// The optional column holding free-form comments.
pub const COMMENTS_COLUMN: &str = "Comments";

/// How many matches of each category are written out in the text report.
pub const REPORT_EXAMPLE_LIMIT: usize = 10;

pub const SAMPLES_JSON_FILENAME: &str = "samples_data.json";
pub const SAMPLES_TEXT_FILENAME: &str = "samples_data.txt";
pub const ANALYSIS_JSON_FILENAME: &str = "pattern_analysis.json";
pub const ANALYSIS_REPORT_FILENAME: &str = "pattern_analysis_report.txt";

pub fn default_tables() -> Vec<String> {
    DEFAULT_TABLES.iter().map(|t| t.to_string()).collect()
}
