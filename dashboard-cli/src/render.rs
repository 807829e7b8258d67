use dashboard_core::{DashboardState, PanelView, Target};

const COLUMN_WIDTH: usize = 44;

/// Full dashboard frame: header, toggles and both panels side by side.
pub fn render_dashboard(state: &DashboardState) -> String {
    let mut out = String::new();

    out.push_str("Weather Dashboard\n");
    out.push_str(&format!(
        "Units: {} | {} | Search: {}\n\n",
        state.units(),
        state.time_format().label(),
        if state.has_search() { state.search_term() } else { "(none)" },
    ));

    let left = panel_lines(Target::CurrentLocation, &state.panel(Target::CurrentLocation));
    let right = panel_lines(Target::SearchedLocation, &state.panel(Target::SearchedLocation));

    for row in 0..left.len().max(right.len()) {
        let l = left.get(row).map(String::as_str).unwrap_or("");
        let r = right.get(row).map(String::as_str).unwrap_or("");
        let line = format!("{:<width$}  {}", fit(l), fit(r), width = COLUMN_WIDTH);
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

pub fn panel_lines(target: Target, view: &PanelView) -> Vec<String> {
    let title = target.title();
    let mut lines = vec![title.to_string(), "-".repeat(title.len())];

    match view {
        PanelView::NoData(message) => lines.push((*message).to_string()),
        PanelView::Loading => lines.push("Loading...".to_string()),
        PanelView::Failed(reason) => lines.push(format!("Unavailable: {reason}")),
        PanelView::Ready(data) => {
            lines.push(data.city_name.clone());
            lines.push(format!("Condition: {}", data.condition));
            lines.push(format!("Temperature: {}", data.temperature));
            lines.push(format!("Wind Speed: {}", data.wind_speed));
            lines.push(format!("Sunrise: {}", data.sunrise));
            lines.push(format!("Sunset: {}", data.sunset));
            lines.push(format!("Icon: {}", data.icon_url));
            if let Some(note) = &data.note {
                lines.push(format!("({note})"));
            }
        }
    }

    lines
}

fn fit(cell: &str) -> String {
    if cell.chars().count() <= COLUMN_WIDTH {
        return cell.to_string();
    }
    let kept: String = cell.chars().take(COLUMN_WIDTH - 3).collect();
    format!("{kept}...")
}
