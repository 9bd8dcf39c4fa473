//! Template macros expanded when a draft is created

use chrono::{DateTime, Local};

use crate::constants as C;

type Expander = fn(&DateTime<Local>) -> String;

const MACROS: &[(&str, Expander)] = &[(C::MACRO_TIMESTAMP, timestamp)];

fn timestamp(now: &DateTime<Local>) -> String {
    now.format(C::MACRO_TIMESTAMP_FORMAT).to_string()
}

/// Replace every known macro in `template` using `now` as the clock
pub fn expand_at(template: &str, now: &DateTime<Local>) -> String {
    let mut out = template.to_string();
    for (name, expander) in MACROS {
        if out.contains(name) {
            out = out.replace(name, &expander(now));
        }
    }
    out
}

/// Replace every known macro in `template`
pub fn expand(template: &str) -> String {
    expand_at(template, &Local::now())
}
