//! Plotly figure specifications and their HTML renderings.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::Result;

/// Script tag that loads plotly.js from the public CDN.
pub const PLOTLY_CDN_SCRIPT: &str =
    r#"<script charset="utf-8" src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>"#;

/// Default qualitative palette, cycled when there are more series than colours.
pub const PALETTE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// A chart: Plotly traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// Stable identifier, also the file stem of the standalone page.
    #[serde(skip)]
    pub name: String,
    pub data: Vec<Value>,
    pub layout: Value,
}

impl Figure {
    pub fn new(name: impl Into<String>, data: Vec<Value>, layout: Value) -> Self {
        Self {
            name: name.into(),
            data,
            layout,
        }
    }

    /// Serialise for embedding inside a `<script>` element.
    ///
    /// `<`, `>` and `&` are written as JSON unicode escapes so no string
    /// value can close the surrounding script.
    pub fn to_script_json(&self) -> Result<String> {
        let data = serde_json::to_string(&self.data)?;
        let layout = serde_json::to_string(&self.layout)?;
        Ok(format!("{}, {}", escape_for_script(&data), escape_for_script(&layout)))
    }

    /// Fragment for inclusion in a larger page: a target `<div>` and the
    /// script that draws into it. With `include_plotlyjs` the fragment
    /// starts by loading plotly.js.
    pub fn to_embed(&self, include_plotlyjs: bool) -> Result<String> {
        let div_id = format!("plot-{}", self.name);
        let mut html = String::new();
        if include_plotlyjs {
            html.push_str(PLOTLY_CDN_SCRIPT);
            html.push('\n');
        }
        html.push_str(&format!(
            "<div id=\"{id}\" class=\"plotly-graph-div\" style=\"height:100%; width:100%;\"></div>\n\
             <script type=\"text/javascript\">\
             Plotly.newPlot(\"{id}\", {spec}, {{\"responsive\": true}});\
             </script>",
            id = div_id,
            spec = self.to_script_json()?,
        ));
        Ok(html)
    }

    /// Self-contained page showing only this figure.
    pub fn to_standalone_html(&self) -> Result<String> {
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
            self.name,
            self.to_embed(true)?
        ))
    }
}

fn escape_for_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(ch),
        }
    }
    out
}

/// Horizontal facet columns sharing one y axis.
pub struct Facets {
    titles: Vec<String>,
}

const FACET_GAP: f64 = 0.03;

impl Facets {
    pub fn new(titles: Vec<String>) -> Self {
        Self { titles }
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Trace-side axis reference: `x`, `x2`, `x3`...
    pub fn axis_ref(index: usize) -> String {
        if index == 0 { "x".to_string() } else { format!("x{}", index + 1) }
    }

    fn layout_key(index: usize) -> String {
        if index == 0 { "xaxis".to_string() } else { format!("xaxis{}", index + 1) }
    }

    fn domain(&self, index: usize) -> (f64, f64) {
        let n = self.titles.len().max(1) as f64;
        let width = (1.0 - FACET_GAP * (n - 1.0)) / n;
        let start = index as f64 * (width + FACET_GAP);
        (start, start + width)
    }

    /// Add one x axis per facet plus a title annotation above each.
    ///
    /// `axis` is merged into every x axis definition.
    pub fn apply(&self, layout: &mut Map<String, Value>, axis: &Value) {
        let mut annotations = Vec::with_capacity(self.titles.len());

        for (i, title) in self.titles.iter().enumerate() {
            let (start, end) = self.domain(i);
            let mut def = json!({ "domain": [start, end], "anchor": "y" });
            if let (Some(target), Some(extra)) = (def.as_object_mut(), axis.as_object()) {
                for (k, v) in extra {
                    target.insert(k.clone(), v.clone());
                }
            }
            layout.insert(Self::layout_key(i), def);

            annotations.push(json!({
                "text": title,
                "x": (start + end) / 2.0,
                "xref": "paper",
                "y": 1.0,
                "yref": "paper",
                "xanchor": "center",
                "yanchor": "bottom",
                "showarrow": false,
            }));
        }

        layout.insert("annotations".to_string(), Value::Array(annotations));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_cannot_close_script() {
        let fig = Figure::new(
            "demo",
            vec![json!({"type": "bar", "name": "</script><b>x</b> & y"})],
            json!({"title": {"text": "a < b"}}),
        );

        let embed = fig.to_embed(false).unwrap();
        assert_eq!(embed.matches("</script>").count(), 1);
        assert!(embed.contains("\\u003c/script\\u003e"));
        assert!(embed.contains("\\u0026"));
        assert!(!embed.contains("cdn.plot.ly"));
        assert!(embed.contains("id=\"plot-demo\""));
    }

    #[test]
    fn test_escaped_json_still_parses() {
        let fig = Figure::new("demo", vec![json!({"name": "<tag>"})], json!({}));
        let script = fig.to_script_json().unwrap();
        let (data, _) = script.split_once(", ").unwrap();
        let parsed: Value = serde_json::from_str(data).unwrap();
        assert_eq!(parsed[0]["name"], "<tag>");
    }

    #[test]
    fn test_standalone_loads_plotly() {
        let fig = Figure::new("trend", Vec::new(), json!({}));
        let html = fig.to_standalone_html().unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(PLOTLY_CDN_SCRIPT));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_facets_split_width() {
        let facets = Facets::new(vec!["2020".into(), "2021".into()]);
        let mut layout = Map::new();
        facets.apply(&mut layout, &json!({"title": {"text": "model"}}));

        assert!(layout.contains_key("xaxis"));
        assert!(layout.contains_key("xaxis2"));
        assert_eq!(layout["xaxis2"]["title"]["text"], "model");
        assert_eq!(layout["annotations"].as_array().unwrap().len(), 2);
        assert_eq!(Facets::axis_ref(1), "x2");

        let end = layout["xaxis2"]["domain"][1].as_f64().unwrap();
        assert!((end - 1.0).abs() < 1e-9);
    }
}
