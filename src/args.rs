use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use serde_json::Value;

/// Splice a sequence of ready values and timed pending computations.
#[derive(Debug, Parser)]
#[command(
    name = "pending-splice",
    author,
    version,
    about = "Wait for the pending items of a sequence and print it with every value in place",
    long_about = "Each ITEM is one of:\n\
                  \x20 @VALUE:MS   pending, resolves with VALUE after MS milliseconds\n\
                  \x20 !REASON:MS  pending, rejects with REASON after MS milliseconds\n\
                  \x20 VALUE       ready value\n\n\
                  VALUE is parsed as JSON, falling back to a plain string."
)]
pub struct Args {
    /// Sequence items, in order.
    #[arg(value_name = "ITEM", required = true, allow_negative_numbers = true)]
    pub items: Vec<ItemSpec>,

    /// Print the result on a single line.
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Log aggregation events to stderr (repeat for trace level).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

/// One command-line item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemSpec {
    Ready(Value),
    Resolve { value: Value, delay: Duration },
    Reject { reason: String, delay: Duration },
}

impl ItemSpec {
    pub fn is_pending(&self) -> bool {
        !matches!(self, ItemSpec::Ready(_))
    }
}

impl FromStr for ItemSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(rest) = s.strip_prefix('@') {
            let (value, delay) = split_delay(rest)?;
            return Ok(ItemSpec::Resolve {
                value: parse_value(value),
                delay,
            });
        }
        if let Some(rest) = s.strip_prefix('!') {
            let (reason, delay) = split_delay(rest)?;
            if reason.is_empty() {
                bail!("rejection reason is empty in {:?}", s);
            }
            return Ok(ItemSpec::Reject {
                reason: reason.to_string(),
                delay,
            });
        }
        Ok(ItemSpec::Ready(parse_value(s)))
    }
}

/// Split `BODY:MS` at the last colon, so JSON bodies may contain colons.
fn split_delay(spec: &str) -> Result<(&str, Duration)> {
    let (body, ms) = spec
        .rsplit_once(':')
        .ok_or_else(|| anyhow!("missing ':MS' delay in {:?}", spec))?;
    let ms: u64 = ms
        .trim()
        .parse()
        .with_context(|| format!("invalid delay {:?} in {:?}", ms, spec))?;
    Ok((body, Duration::from_millis(ms)))
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_ready_values() {
        assert_eq!("1".parse::<ItemSpec>().unwrap(), ItemSpec::Ready(json!(1)));
        assert_eq!("a".parse::<ItemSpec>().unwrap(), ItemSpec::Ready(json!("a")));
        assert_eq!(
            "[1,2]".parse::<ItemSpec>().unwrap(),
            ItemSpec::Ready(json!([1, 2]))
        );
    }

    #[test]
    fn test_parse_resolve_spec() {
        let spec: ItemSpec = "@42:30".parse().unwrap();
        assert_eq!(
            spec,
            ItemSpec::Resolve {
                value: json!(42),
                delay: Duration::from_millis(30)
            }
        );
        assert!(spec.is_pending());
    }

    #[test]
    fn test_parse_resolve_json_with_colons() {
        let spec: ItemSpec = r#"@{"k":1}:5"#.parse().unwrap();
        assert_eq!(
            spec,
            ItemSpec::Resolve {
                value: json!({"k": 1}),
                delay: Duration::from_millis(5)
            }
        );
    }

    #[test]
    fn test_parse_reject_spec() {
        let spec: ItemSpec = "!boom:1".parse().unwrap();
        assert_eq!(
            spec,
            ItemSpec::Reject {
                reason: "boom".to_string(),
                delay: Duration::from_millis(1)
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!("@42".parse::<ItemSpec>().is_err());
        assert!("@42:soon".parse::<ItemSpec>().is_err());
        assert!("!:5".parse::<ItemSpec>().is_err());
    }

    #[test]
    fn test_args_accept_negative_numbers() {
        let args = Args::try_parse_from(["pending-splice", "-3", "@4:1"]).unwrap();
        assert_eq!(args.items.len(), 2);
        assert_eq!(args.items[0], ItemSpec::Ready(json!(-3)));
        assert_eq!(args.log_level(), tracing::Level::WARN);
    }
}
