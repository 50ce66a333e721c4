use maud::{html, Markup};

use crate::db::DateRange;

/// Routes listed on the landing page, in display order
pub const API_ROUTES: [&str; 5] = [
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/yyyy-mm-dd",
    "/api/v1.0/yyyy-mm-dd/yyyy-mm-dd",
];

pub fn home_page(range: Option<DateRange>) -> Markup {
    html! {
        "Available Routes:"
        br;
        @for route in API_ROUTES {
            (route)
            br;
        }
        br;
        "Please enter dates in (yyyy-mm-dd) format"
        br;
        @match range {
            Some(range) => {
                "Data available between " (range.first()) " to " (range.last())
            }
            None => {
                "No observations are available"
            }
        }
    }
}
