// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump of a diffed scene.

use std::collections::HashMap;

use kurbo::Rect;
use peniko::Brush;
use vizkit_core::{Mark, MarkDiff, MarkId, MarkPayload, TextAnchor, TextBaseline};

#[derive(Debug, Default)]
pub(crate) struct SvgScene {
    marks: HashMap<MarkId, Mark>,
    view_box: Option<Rect>,
}

impl SvgScene {
    pub(crate) fn set_view_box(&mut self, view_box: Rect) {
        self.view_box = Some(view_box);
    }

    pub(crate) fn apply_diffs(&mut self, diffs: &[MarkDiff]) {
        for diff in diffs {
            match diff {
                MarkDiff::Enter { id, new, .. } | MarkDiff::Update { id, new, .. } => {
                    self.marks.insert(*id, (**new).clone());
                }
                MarkDiff::Exit { id, .. } => {
                    self.marks.remove(id);
                }
            }
        }
    }

    pub(crate) fn to_svg_string(&self) -> String {
        let view_box = self
            .view_box
            .unwrap_or_else(|| Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut out = String::new();
        out.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}" height="{}" font-family="sans-serif">"#,
            view_box.x0,
            view_box.y0,
            view_box.width(),
            view_box.height(),
            view_box.width(),
            view_box.height()
        ));
        out.push('\n');

        let mut marks: Vec<&Mark> = self.marks.values().collect();
        marks.sort_by_key(|m| (m.z_index, m.id.0));

        for mark in marks {
            let opacity = if mark.opacity < 1.0 {
                format!(r#" opacity="{}""#, mark.opacity)
            } else {
                String::new()
            };
            match &mark.payload {
                MarkPayload::Rect(r) => {
                    out.push_str(&format!(
                        r#"<rect x="{}" y="{}" width="{}" height="{}"{opacity}"#,
                        r.rect.x0,
                        r.rect.y0,
                        r.rect.width(),
                        r.rect.height(),
                    ));
                    write_paint_attr(&mut out, "fill", &r.fill);
                    out.push_str("/>\n");
                }
                MarkPayload::Circle(c) => {
                    out.push_str(&format!(
                        r#"<circle cx="{}" cy="{}" r="{}"{opacity}"#,
                        c.center.x, c.center.y, c.radius
                    ));
                    write_paint_attr(&mut out, "fill", &c.fill);
                    if c.stroke_width > 0.0 {
                        write_paint_attr(&mut out, "stroke", &c.stroke);
                        out.push_str(&format!(r#" stroke-width="{}""#, c.stroke_width));
                    }
                    out.push_str("/>\n");
                }
                MarkPayload::Text(t) => {
                    let baseline = match t.baseline {
                        TextBaseline::Middle => "middle",
                        TextBaseline::Alphabetic => "alphabetic",
                        TextBaseline::Hanging => "hanging",
                    };
                    out.push_str(&format!(
                        r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="{}"{opacity}"#,
                        t.pos.x, t.pos.y, t.font_size, baseline
                    ));
                    if t.angle != 0.0 {
                        out.push_str(&format!(
                            r#" transform="rotate({} {} {})""#,
                            t.angle, t.pos.x, t.pos.y
                        ));
                    }
                    out.push_str(match t.anchor {
                        TextAnchor::Start => r#" text-anchor="start""#,
                        TextAnchor::Middle => r#" text-anchor="middle""#,
                        TextAnchor::End => r#" text-anchor="end""#,
                    });
                    write_paint_attr(&mut out, "fill", &t.fill);
                    out.push('>');
                    out.push_str(&escape_xml(&t.text));
                    out.push_str("</text>\n");
                }
                MarkPayload::Path(p) => {
                    let d = p.path.to_svg();
                    out.push_str(&format!(r#"<path d="{d}"{opacity}"#));
                    write_paint_attr(&mut out, "fill", &p.fill);
                    if p.stroke_width > 0.0 {
                        write_paint_attr(&mut out, "stroke", &p.stroke);
                        out.push_str(&format!(r#" stroke-width="{}""#, p.stroke_width));
                        // A partially revealed path draws only its leading fraction.
                        if p.reveal < 1.0 {
                            out.push_str(&format!(
                                r#" pathLength="1" stroke-dasharray="{} 1""#,
                                p.reveal.max(0.0)
                            ));
                        } else if let Some((on, off)) = p.dash {
                            out.push_str(&format!(r#" stroke-dasharray="{on} {off}""#));
                        }
                    }
                    out.push_str("/>\n");
                }
            }
        }

        out.push_str("</svg>\n");
        out
    }
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let fill_opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, fill_opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    if opacity == Some(0.0) {
        out.push_str(&format!(r#" {name}="none""#));
        return;
    }
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{BezPath, Point};
    use peniko::Color;
    use vizkit_core::{PathMark, Scene, TextMark};

    #[test]
    fn exits_remove_marks_and_reveal_becomes_a_dash() {
        let mut scene = Scene::new();
        let mut path = BezPath::new();
        path.move_to(Point::new(0.0, 0.0));
        path.line_to(Point::new(10.0, 10.0));
        let mut line = PathMark::stroked(path, Color::BLACK, 2.0);
        line.reveal = 0.5;
        let text = TextMark::new(Point::new(1.0, 1.0), "a<b", Color::BLACK);
        let marks = vec![
            Mark::new(MarkId(1), 0, MarkPayload::Path(line)),
            Mark::new(MarkId(2), 0, MarkPayload::Text(text)),
        ];
        let mut svg = SvgScene::default();
        svg.apply_diffs(&scene.tick(marks));
        let out = svg.to_svg_string();
        assert!(out.starts_with("<svg ") && out.ends_with("</svg>\n"));
        assert!(out.contains(r#"stroke-width="2""#));
        assert!(out.contains(r#"stroke-dasharray="0.5 1""#));
        assert!(out.contains("a&lt;b"));

        svg.apply_diffs(&scene.tick(Vec::new()));
        assert!(!svg.to_svg_string().contains("<path"));
    }
}
