//! Output formatting module.

mod formatter;
mod human;
mod json;
mod xml;

pub use formatter::OutputFormatter;

use human::HumanFormatter;
use json::JsonFormatter;
use xml::XmlFormatter;

/// Creates an output formatter based on CLI flags
pub fn create_formatter(
    json: bool,
    xml: bool,
    verbose: bool,
    quiet: bool,
) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else if xml {
        Box::new(XmlFormatter)
    } else {
        Box::new(HumanFormatter::new(verbose, quiet))
    }
}
