//! Order report formatting

use anyhow::Result;
use serde::Serialize;

use zorder_core::{Canvas, DrawId, FinalizeStats};

/// Everything printed for one finalized scene
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub order: Vec<DrawId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<&'a FinalizeStats>>,
}

impl<'a> Report<'a> {
    pub fn new(canvas: &'a Canvas, with_stats: bool) -> Result<Self> {
        Ok(Self {
            order: canvas.get_order()?,
            stats: with_stats.then(|| canvas.stats()),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_text(&self) -> String {
        let order: Vec<String> = self.order.iter().map(ToString::to_string).collect();
        let mut out = format!("order: {}\n", order.join(" "));

        for (i, stats) in self.stats.iter().flatten().enumerate() {
            out.push_str(&format!(
                "device {i}: {} commands, {} material switches, {} state switches \
                 ({} frames popped, {} pushed), {} distinct states, \
                 {} fragments passed, {} rejected\n",
                stats.commands,
                stats.material_switches,
                stats.state_switches,
                stats.frames_popped,
                stats.frames_pushed,
                stats.distinct_states,
                stats.fragments_passed,
                stats.fragments_rejected,
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zorder_core::Scene;

    fn finalized(source: &str) -> Canvas {
        let mut canvas = Scene::from_toml_str(source).unwrap().record().unwrap();
        canvas.finalize().unwrap();
        canvas
    }

    const TWO_DRAWS: &str = r##"
        [[op]]
        kind = "draw"
        id = 7
        rect = [0, 0, 2, 2]
        material = { kind = "solid", color = "#00ff00" }

        [[op]]
        kind = "draw"
        id = 8
        rect = [0, 0, 2, 2]
        material = { kind = "solid", color = "#00ff0080" }
    "##;

    #[test]
    fn test_text_report() {
        let canvas = finalized(TWO_DRAWS);
        let report = Report::new(&canvas, false).unwrap();
        assert_eq!(report.to_text(), "order: 7 8\n");

        let report = Report::new(&canvas, true).unwrap();
        assert!(report.to_text().contains("device 0: 2 commands"));
    }

    #[test]
    fn test_json_report() {
        let canvas = finalized(TWO_DRAWS);
        let json: serde_json::Value =
            serde_json::from_str(&Report::new(&canvas, true).unwrap().to_json().unwrap()).unwrap();
        assert_eq!(json["order"], serde_json::json!([7, 8]));
        assert_eq!(json["stats"][0]["commands"], 2);
        assert_eq!(json["stats"][0]["fragments_passed"], 8);

        let json: serde_json::Value =
            serde_json::from_str(&Report::new(&canvas, false).unwrap().to_json().unwrap()).unwrap();
        assert!(json.get("stats").is_none());
    }
}
