//! The two read-only reference tables: dice value → catch, and catch → points.
use std::{collections::HashMap, fs};

use camino::Utf8Path;
use tracing::{debug, warn};

use crate::error::Error;

/// Catch name returned for a dice value the mapping table doesn't cover.
pub const UNKNOWN_CATCH: &str = "Unknown";

/// Catches that are always kept; the player is never asked about them.
pub const AUTO_KEEP_CATCHES: [&str; 2] = ["Lost Bait", "Old Boot"];

/// `(dice, catch, points if kept, points if released)` for the tables shipped with `reeldice`.
const BUILTIN_CATCHES: [(u8, &str, i64, i64); 6] = [
    (1, "King George Whiting", 10, 6),
    (2, "Snapper", 8, 5),
    (3, "Flathead", 6, 4),
    (4, "Australian Salmon", 4, 3),
    (5, "Lost Bait", 0, 0),
    (6, "Old Boot", -1, 0),
];

/// Whether `catch` skips the keep/release decision.
pub fn is_auto_keep(catch: &str) -> bool {
    AUTO_KEEP_CATCHES.iter().any(|name| *name == catch)
}

/// Points awarded for a catch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FishInfo {
    /// Points if the player keeps the catch.
    pub points_if_kept: i64,
    /// Points if the player releases the catch.
    pub points_if_released: i64,
}
impl FishInfo {
    /// The points for a keep/release decision.
    pub fn points(&self, kept: bool) -> i64 {
        if kept {
            self.points_if_kept
        } else {
            self.points_if_released
        }
    }
}

/// Both reference tables, owned together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTables {
    catches: HashMap<u8, String>,
    fish_info: HashMap<String, FishInfo>,
}
impl LookupTables {
    /// Parse both tables from delimited text.
    ///
    /// `mapping` needs `DiceNumber` and `FishName` columns; `info` needs `FishName`,
    /// `PointsIfKept` and `PointsIfReleased`. Columns may appear in any order.
    pub fn from_csv_str(mapping: &str, info: &str) -> Result<Self, Error> {
        let mapping_table = DelimitedTable::parse("fish_mapping", mapping)?;
        let dice_col = mapping_table.column("DiceNumber")?;
        let mapping_name_col = mapping_table.column("FishName")?;

        let mut catches = HashMap::new();
        for (line, row) in mapping_table.rows() {
            let Ok(dice) = row[dice_col].parse::<u8>() else {
                warn!(table = "fish_mapping", line, "skipping row with bad DiceNumber");
                continue;
            };
            catches.insert(dice, row[mapping_name_col].to_owned());
        }

        let info_table = DelimitedTable::parse("fish_info", info)?;
        let info_name_col = info_table.column("FishName")?;
        let kept_col = info_table.column("PointsIfKept")?;
        let released_col = info_table.column("PointsIfReleased")?;

        let mut fish_info = HashMap::new();
        for (line, row) in info_table.rows() {
            let (Ok(points_if_kept), Ok(points_if_released)) =
                (row[kept_col].parse::<i64>(), row[released_col].parse::<i64>())
            else {
                warn!(table = "fish_info", line, "skipping row with bad points");
                continue;
            };
            fish_info.insert(
                row[info_name_col].to_owned(),
                FishInfo {
                    points_if_kept,
                    points_if_released,
                },
            );
        }

        debug!(
            catches = catches.len(),
            fish = fish_info.len(),
            "loaded lookup tables"
        );
        Ok(Self { catches, fish_info })
    }

    /// Read and parse both tables from files.
    pub fn load<P, Q>(mapping_path: P, info_path: Q) -> Result<Self, Error>
    where
        P: AsRef<Utf8Path>,
        Q: AsRef<Utf8Path>,
    {
        let read = |path: &Utf8Path| {
            fs::read_to_string(path).map_err(|err| Error::store_io(path, err))
        };
        Self::from_csv_str(&read(mapping_path.as_ref())?, &read(info_path.as_ref())?)
    }

    /// The catch for a dice value, or [UNKNOWN_CATCH].
    pub fn catch_for(&self, dice: u8) -> &str {
        self.catches
            .get(&dice)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CATCH)
    }

    /// The [FishInfo] for a catch, if the info table has one.
    pub fn info_for(&self, catch: &str) -> Option<&FishInfo> {
        self.fish_info.get(catch)
    }

    /// The points for a catch and decision. Catches missing from the info table are worth 0.
    pub fn points_for(&self, catch: &str, kept: bool) -> i64 {
        self.info_for(catch)
            .map(|info| info.points(kept))
            .unwrap_or_default()
    }

    /// Every dice value the mapping table covers, sorted.
    pub fn dice_values(&self) -> Vec<u8> {
        let mut values: Vec<u8> = self.catches.keys().copied().collect();
        values.sort_unstable();
        values
    }
}
impl Default for LookupTables {
    fn default() -> Self {
        let catches = BUILTIN_CATCHES
            .iter()
            .map(|(dice, name, _, _)| (*dice, (*name).to_owned()))
            .collect();
        let fish_info = BUILTIN_CATCHES
            .iter()
            .map(|(_, name, kept, released)| {
                (
                    (*name).to_owned(),
                    FishInfo {
                        points_if_kept: *kept,
                        points_if_released: *released,
                    },
                )
            })
            .collect();
        Self { catches, fish_info }
    }
}

/// A header row plus the data rows whose field count matches it.
struct DelimitedTable<'a> {
    name: &'static str,
    header: Vec<&'a str>,
    body: Vec<(usize, &'a str)>,
}
impl<'a> DelimitedTable<'a> {
    fn parse(name: &'static str, contents: &'a str) -> Result<Self, Error> {
        let mut lines = contents
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty());
        let Some((_, header_line)) = lines.next() else {
            return Err(Error::MalformedTableError(
                name.to_owned(),
                String::from("no header row"),
            ));
        };
        Ok(Self {
            name,
            header: header_line.split(',').map(str::trim).collect(),
            body: lines.collect(),
        })
    }

    fn column(&self, column: &str) -> Result<usize, Error> {
        self.header
            .iter()
            .position(|field| *field == column)
            .ok_or_else(|| {
                Error::MalformedTableError(
                    self.name.to_owned(),
                    format!("missing column \"{column}\""),
                )
            })
    }

    fn rows(&self) -> impl Iterator<Item = (usize, Vec<&'a str>)> + '_ {
        let width = self.header.len();
        self.body.iter().filter_map(move |&(line, text)| {
            let fields: Vec<&'a str> = text.split(',').map(str::trim).collect();
            if fields.len() == width {
                Some((line, fields))
            } else {
                warn!(
                    table = self.name,
                    line,
                    "skipping row with {} fields, expected {width}",
                    fields.len()
                );
                None
            }
        })
    }
}
