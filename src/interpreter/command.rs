/*! Line parser for work-attestation scripts

Each non-blank line that does not start with `#` holds one command: a
case-insensitive keyword followed by whitespace-separated arguments. Extra
arguments are ignored. Keywords outside the vocabulary parse to
`Command::Unknown` so the caller decides what to do with them.
*/

use serde::Serialize;

pub const COMMENT_MARKER: char = '#';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Contract { id: String },
    Contractor { id: String },
    RegisterWork { work_item: String, quantity: String },
    SensorData {
        moisture: String,
        ultrasonic: String,
        temperature: String,
    },
    HashDetail { name: String, value: Option<String> },
    Validate,
    GenerateTx,
    CalculateGas { value: String },
    Display,
    Unknown { keyword: String },
}

impl Command {
    pub fn keyword(&self) -> &str {
        match self {
            Command::Contract { .. } => "CONTRACT",
            Command::Contractor { .. } => "CONTRACTOR",
            Command::RegisterWork { .. } => "REGISTER_WORK",
            Command::SensorData { .. } => "SENSOR_DATA",
            Command::HashDetail { .. } => "HASH_DETAIL",
            Command::Validate => "VALIDATE",
            Command::GenerateTx => "GENERATE_TX",
            Command::CalculateGas { .. } => "CALCULATE_GAS",
            Command::Display => "DISPLAY",
            Command::Unknown { keyword } => keyword.as_str(),
        }
    }

    pub fn is_commit(&self) -> bool {
        matches!(self, Command::GenerateTx)
    }
}

/// A known command whose required argument is absent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingArgument {
    pub keyword: &'static str,
    pub argument: &'static str,
}

/// One parsed, non-skipped script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-based line number in the script
    pub number: usize,
    pub parsed: Result<Command, MissingArgument>,
}

/// Parse a single line. Blank lines and comments yield `None`.
pub fn parse_line(line: &str) -> Option<Result<Command, MissingArgument>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(COMMENT_MARKER) {
        return None;
    }

    let mut parts = line.split_whitespace();
    let keyword = parts.next()?.to_uppercase();
    let args: Vec<&str> = parts.collect();
    let arg = |i: usize| args.get(i).map(|s| s.to_string());
    let required = |i: usize, keyword: &'static str, argument: &'static str| {
        arg(i).ok_or(MissingArgument { keyword, argument })
    };

    let parsed = match keyword.as_str() {
        "CONTRACT" => required(0, "CONTRACT", "id").map(|id| Command::Contract { id }),
        "CONTRACTOR" => required(0, "CONTRACTOR", "id").map(|id| Command::Contractor { id }),
        "REGISTER_WORK" => {
            required(0, "REGISTER_WORK", "work_item").map(|work_item| Command::RegisterWork {
                work_item,
                quantity: arg(1).unwrap_or_else(|| "0".to_string()),
            })
        }
        // SENSOR_DATA replaces all three readings; absent ones read as "0"
        "SENSOR_DATA" => Ok(Command::SensorData {
            moisture: arg(0).unwrap_or_else(|| "0".to_string()),
            ultrasonic: arg(1).unwrap_or_else(|| "0".to_string()),
            temperature: arg(2).unwrap_or_else(|| "0".to_string()),
        }),
        "HASH_DETAIL" => required(0, "HASH_DETAIL", "name")
            .map(|name| Command::HashDetail { name, value: arg(1) }),
        "VALIDATE" => Ok(Command::Validate),
        "GENERATE_TX" | "COMMIT" => Ok(Command::GenerateTx),
        "CALCULATE_GAS" => {
            required(0, "CALCULATE_GAS", "value").map(|value| Command::CalculateGas { value })
        }
        "DISPLAY" => Ok(Command::Display),
        _ => Ok(Command::Unknown { keyword }),
    };
    Some(parsed)
}

/// Parse a whole script, keeping line numbers for diagnostics
pub fn parse_script(script: &str) -> Vec<ScriptLine> {
    script
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            parse_line(line).map(|parsed| ScriptLine {
                number: i + 1,
                parsed,
            })
        })
        .collect()
}
