use crate::models::{Extreme, HourPoint, SummarySet};

/// Extrema over the hourly window, or `None` for an empty window.
///
/// Each scan keeps the first point holding the extreme value: a later point
/// only replaces it when strictly greater (or strictly lower for `coolest`).
/// Missing rain probability and gusts count as 0.
pub fn summarize(window: &[HourPoint]) -> Option<SummarySet> {
    Some(SummarySet {
        hottest: extreme_by(window, |p| p.temp_c, Pick::Max)?,
        coolest: extreme_by(window, |p| p.temp_c, Pick::Min)?,
        peak_rain_chance: extreme_by(window, |p| p.precip_probability.unwrap_or(0.0), Pick::Max)?,
        peak_wind: extreme_by(window, |p| p.wind_speed_kmh, Pick::Max)?,
        peak_gust: extreme_by(window, |p| p.wind_gust_kmh.unwrap_or(0.0), Pick::Max)?,
    })
}

#[derive(Clone, Copy)]
enum Pick {
    Max,
    Min,
}

fn extreme_by(window: &[HourPoint], value: impl Fn(&HourPoint) -> f64, pick: Pick) -> Option<Extreme> {
    let (first, rest) = window.split_first()?;
    let mut best = Extreme {
        value: value(first),
        occurred_at: first.timestamp,
    };

    for point in rest {
        let v = value(point);
        let better = match pick {
            Pick::Max => v > best.value,
            Pick::Min => v < best.value,
        };
        if better {
            best = Extreme {
                value: v,
                occurred_at: point.timestamp,
            };
        }
    }

    Some(best)
}
