// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lays out every vizkit chart family and writes each frame as an SVG file.
//!
//! Besides static frames, the demo replays a hover/click sequence on the bar chart, steps the
//! interval line's entrance animation and plays the stacked-bar timeline, logging how many marks
//! each step changes. Set `RUST_LOG=debug` to see layout decisions.
//!
//! Usage: `vizkit_charts_demo [output-dir]`.

mod svg;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use kurbo::{Point, Rect};
use peniko::Color;
use tracing_subscriber::EnvFilter;
use vizkit_charts::{
    AnimateLine, BarChartSpec, BarOrientation, BeeSwarmChartSpec, CellAlign, ChartFrame,
    ChartSettings, ColorLegendSpec, DataTableColumn, DataTableSpec, DumbbellChartSpec,
    GroupedBarChartSpec, HeuristicTextMeasurer, HitTarget, InteractionController,
    IntervalLineChartSpec, LegendEntry, Palette, RegressionLine, ScatterChartSpec,
    StackedAreaChartSpec, StackedBarChartSpec, StripChartSpec, StripStyle, TableView, Template,
    ThresholdLegendSpec, ViewState,
};
use vizkit_core::{
    Annotation, AreaDatum, BarDatum, BeeSwarmDatum, DumbbellDatum, GroupedBarDatum, HighlightArea,
    IntervalDatum, Label, Mark, MarkPayload, Record, ReferenceValue, ScatterDatum, Scene,
    StackedBarDatum, StripDatum,
};

/// Writes frames into one directory.
struct Output {
    dir: PathBuf,
}

/// One chart's scene and its SVG mirror, kept across frames so each write is a diff.
#[derive(Debug, Default)]
struct Replay {
    scene: Scene,
    svg: svg::SvgScene,
}

impl Output {
    fn write(
        &self,
        name: &str,
        view: Rect,
        marks: Vec<Mark>,
        replay: &mut Replay,
    ) -> io::Result<()> {
        let diffs = replay.scene.tick(marks);
        replay.svg.set_view_box(view);
        replay.svg.apply_diffs(&diffs);
        let path = self.dir.join(format!("{name}.svg"));
        fs::write(&path, replay.svg.to_svg_string())?;
        tracing::info!(
            file = %path.display(),
            changed = diffs.len(),
            marks = replay.scene.len(),
            "wrote frame"
        );
        Ok(())
    }

    fn frame(&self, name: &str, frame: &ChartFrame) -> io::Result<()> {
        let view = Rect::new(0.0, 0.0, frame.size.width, frame.size.height);
        self.write(name, view, frame.marks.clone(), &mut Replay::default())
    }
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let dir = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("vizkit_charts_demo_out"), PathBuf::from);
    fs::create_dir_all(&dir)?;
    let out = Output { dir };

    bar_demo(&out)?;
    grouped_bar_demo(&out)?;
    stacked_bar_demo(&out)?;
    dumbbell_demo(&out)?;
    scatter_demo(&out)?;
    strip_demo(&out)?;
    bee_swarm_demo(&out)?;
    interval_line_demo(&out)?;
    stacked_area_demo(&out)?;
    legend_demo(&out)?;
    data_table_demo(out.dir.as_path())?;
    Ok(())
}

fn countries() -> [&'static str; 6] {
    ["Chad", "Peru", "Fiji", "Nepal", "Chile", "Ghana"]
}

fn bar_demo(out: &Output) -> io::Result<()> {
    let data: Vec<BarDatum> = countries()
        .into_iter()
        .zip([42.0, -12.5, 18.0, 7.25, 31.0, -4.0])
        .map(|(c, v)| BarDatum::new(c, Some(v)))
        .collect();
    let template = Template::parse("{{label}}: {{size}}").map_err(io::Error::other)?;
    let spec = BarChartSpec::default()
        .with_chart(ChartSettings::default().with_tooltip(template))
        .with_values(true)
        .with_affixes("", "%")
        .with_ref_values(vec![ReferenceValue::new(20.0, "Target")])
        .with_axis_title("Change");

    // Replay hover then click on the third bar against one persistent scene.
    let mut replay = Replay::default();
    let mut controller: InteractionController<HitTarget> = spec.chart.controller();
    let frame = spec.layout(&data, &controller.view_state());
    let view = Rect::new(0.0, 0.0, frame.size.width, frame.size.height);
    out.write("bar", view, frame.marks.clone(), &mut replay)?;

    let probe = frame
        .marks
        .iter()
        .filter_map(|m| match &m.payload {
            MarkPayload::Rect(r) => Some(r.rect.center()),
            _ => None,
        })
        .nth(2);
    if let Some(target) = probe.and_then(|p| frame.hit_test(p)).cloned() {
        if let Some(tip) = target.datum.and_then(|i| spec.chart.tooltip_text(&data[i])) {
            tracing::info!(%tip, "tooltip");
        }
        controller.pointer_enter(target.clone());
        let hovered = spec.layout(&data, &controller.view_state());
        out.write("bar_hover", view, hovered.marks, &mut replay)?;
        controller.click(target.clone());
        controller.click(target);
        tracing::info!(idle = controller.selection().is_idle(), "double click");
    }
    Ok(())
}

fn grouped_bar_demo(out: &Output) -> io::Result<()> {
    let data = vec![
        GroupedBarDatum::new("2019", [Some(12.0), Some(30.0), Some(8.0)]),
        GroupedBarDatum::new("2020", [Some(15.0), None, Some(11.0)]),
        GroupedBarDatum::new("2021", [Some(21.0), Some(26.0), Some(5.0)]),
    ];
    for (name, orientation) in [
        ("grouped_bar_horizontal", BarOrientation::Horizontal),
        ("grouped_bar_vertical", BarOrientation::Vertical),
    ] {
        let spec = GroupedBarChartSpec::new(orientation).with_values(true);
        out.frame(name, &spec.layout(&data, &ViewState::default()))?;
    }
    Ok(())
}

fn stacked_bar_demo(out: &Output) -> io::Result<()> {
    let data: Vec<StackedBarDatum> = (2019..=2022)
        .flat_map(|year| {
            let t = f64::from(year - 2018);
            countries().into_iter().take(3).enumerate().map(move |(i, c)| {
                #[allow(clippy::cast_precision_loss, reason = "tiny index")]
                let k = i as f64 + 1.0;
                StackedBarDatum::new(c, year, [Some(k * t), Some(10.0 - k), Some(t * 2.0)])
            })
        })
        .collect();
    let spec = StackedBarChartSpec::default().with_values(true);
    let mut timeline = spec.timeline(&data, true);
    let mut replay = Replay::default();
    let mut now = Duration::ZERO;
    timeline.tick(now);
    for step in 0..timeline.dates().len() {
        let frame = spec.layout(&data, &timeline, &ViewState::default());
        let view = Rect::new(0.0, 0.0, frame.size.width, frame.size.height);
        out.write(&format!("stacked_bar_{step}"), view, frame.marks, &mut replay)?;
        now += vizkit_charts::TIMELINE_STEP;
        timeline.tick(now);
    }
    Ok(())
}

fn dumbbell_demo(out: &Output) -> io::Result<()> {
    let data: Vec<DumbbellDatum> = countries()
        .into_iter()
        .zip([(20.0, 65.0), (35.0, 40.0), (80.0, 55.0), (10.0, 90.0), (45.0, 60.0), (5.0, 15.0)])
        .map(|(c, (a, b))| DumbbellDatum::new(c, [Some(a), Some(b)]))
        .collect();
    let spec = DumbbellChartSpec::default()
        .with_arrow_connector(true)
        .with_values(true)
        .with_axis_title("Share (%)");
    out.frame("dumbbell", &spec.layout(&data, &ViewState::default()))
}

fn scatter_demo(out: &Output) -> io::Result<()> {
    let data: Vec<ScatterDatum> = countries()
        .into_iter()
        .zip([
            (1.2, 3.4, 20.0),
            (2.5, 2.0, 5.0),
            (4.0, 6.5, 12.0),
            (6.1, 5.2, 40.0),
            (7.7, 8.9, 2.0),
            (3.3, 1.1, 9.0),
        ])
        .enumerate()
        .map(|(i, (c, (x, y, r)))| {
            ScatterDatum::new(x, y)
                .with_radius(r)
                .with_label(c)
                .with_color(if i % 2 == 0 { "Africa" } else { "Americas" })
        })
        .collect();
    let spec = ScatterChartSpec::default()
        .with_max_radius_value(40.0)
        .with_radius(20.0)
        .with_axis_titles(Some("Income".into()), Some("Outcome".into()))
        .with_highlight_area(HighlightArea::x_range(Some(2.0), Some(4.0)), None)
        .with_annotations(vec![Annotation::new("Peak", 7.7, 8.9).with_offset(-40.0, -10.0)])
        .with_regression(RegressionLine::default());
    out.frame("scatter", &spec.layout(&data, &ViewState::default()))
}

fn strip_demo(out: &Output) -> io::Result<()> {
    let data: Vec<StripDatum> = countries()
        .into_iter()
        .zip([0.42, 0.61, 0.55, 0.38, 0.71, 0.49])
        .map(|(c, v)| StripDatum::new(c, v))
        .collect();
    for (name, style) in [("strip_dots", StripStyle::Dot), ("strip_bars", StripStyle::Strip)] {
        let spec = StripChartSpec::default()
            .with_style(style)
            .with_highlighted(vec![Label::from("Nepal")], Some(Color::from_rgb8(0xe5, 0x24, 0x3b)));
        out.frame(name, &spec.layout(&data, &ViewState::default()))?;
    }
    Ok(())
}

fn bee_swarm_demo(out: &Output) -> io::Result<()> {
    let data: Vec<BeeSwarmDatum> = countries()
        .into_iter()
        .zip([12.0, 18.0, 25.0, 31.0, 22.0, 40.0])
        .map(|(c, v)| BeeSwarmDatum::new(c, v).with_radius(v))
        .collect();
    let spec = BeeSwarmChartSpec::default()
        .with_max_radius_value(40.0)
        .with_highlighted(vec![Label::from("Fiji")])
        .with_ref_values(vec![ReferenceValue::new(20.0, "Median")]);
    out.frame("bee_swarm", &spec.layout(&data, &ViewState::default()))
}

fn interval_line_demo(out: &Output) -> io::Result<()> {
    let data: Vec<IntervalDatum> = (2010..=2022)
        .map(|year| {
            let t = f64::from(year - 2010);
            IntervalDatum::new(year, Some(20.0 + 3.0 * t))
                .with_interval(15.0 + 2.5 * t, 24.0 + 3.6 * t)
        })
        .collect();
    let spec = IntervalLineChartSpec::default()
        .with_interval_dots(true, false)
        .with_highlight_area(Some(Label::from(2015)), Some(Label::from(2018)), None)
        .with_animate(AnimateLine::Seconds(2.0));

    let mut sequencer = spec.sequencer();
    sequencer.notify_visible(Duration::ZERO, !data.is_empty());
    let mut replay = Replay::default();
    for (i, secs) in [0.0, 1.0, 2.0, 3.0, 6.5].into_iter().enumerate() {
        let anim = sequencer.frame(Duration::from_secs_f64(secs));
        let frame = spec.layout_at(&data, &ViewState::default(), anim);
        let view = Rect::new(0.0, 0.0, frame.size.width, frame.size.height);
        tracing::info!(secs, phase = ?anim.phase, reveal = anim.path_reveal, "animation step");
        out.write(&format!("interval_line_{i}"), view, frame.marks, &mut replay)?;
    }
    Ok(())
}

fn stacked_area_demo(out: &Output) -> io::Result<()> {
    let data: Vec<AreaDatum> = (2000..=2020)
        .step_by(2)
        .map(|year| {
            let t = f64::from(year - 2000);
            AreaDatum::new(year, [Some(10.0 + t), Some(30.0 - t), Some(5.0 + 0.5 * t)])
        })
        .collect();
    let spec = StackedAreaChartSpec::default()
        .with_colors(
            Palette::categorical(),
            vec!["Urban".into(), "Rural".into(), "Peri-urban".into()],
        )
        .with_highlight_area(Some(Label::from(2008)), Some(Label::from(2012)), None);
    out.frame("stacked_area", &spec.layout(&data, &ViewState::default()))?;

    let legend = spec
        .legend()
        .with_title("Population")
        .at(Point::new(10.0, 10.0), 400.0, &HeuristicTextMeasurer);
    let bounds = legend.bounds().inflate(10.0, 10.0);
    out.write("stacked_area_legend", bounds, legend.marks(None), &mut Replay::default())
}

fn legend_demo(out: &Output) -> io::Result<()> {
    let palette = Palette::categorical();
    let categorical = ColorLegendSpec::new(
        ["Low", "Medium", "High"]
            .into_iter()
            .enumerate()
            .map(|(i, l)| LegendEntry::new(l, palette.get(i)))
            .collect(),
    )
    .with_na()
    .at(Point::new(10.0, 10.0), 300.0, &HeuristicTextMeasurer);
    let hovered = Some(palette.get(1));
    out.write(
        "legend_categorical",
        categorical.bounds().inflate(10.0, 10.0),
        categorical.marks(hovered),
        &mut Replay::default(),
    )?;

    let threshold = ThresholdLegendSpec::new(
        (0..4).map(|i| palette.get(i)).collect(),
        vec![10.0, 20.0, 50.0],
    )
    .with_na_color(vizkit_charts::GRAY);
    out.write(
        "legend_threshold",
        Rect::new(0.0, 0.0, 380.0, 60.0),
        threshold.marks(Point::new(10.0, 10.0), None),
        &mut Replay::default(),
    )
}

fn data_table_demo(dir: &Path) -> io::Result<()> {
    let spec = DataTableSpec::new(vec![
        DataTableColumn::new("country").with_title("Country").with_width(2.0).sortable(),
        DataTableColumn::new("region")
            .with_separator(";")
            .with_filter_options(vec!["Africa".into(), "Americas".into(), "Pacific".into()]),
        DataTableColumn::new("gdp")
            .with_title("GDP")
            .with_align(CellAlign::Right)
            .with_affixes("$", "")
            .sortable(),
    ]);
    let rows: Vec<Record> = [
        ("Chad", "Africa", 12.6e9),
        ("Peru", "Americas", 242.0e9),
        ("Fiji", "Pacific", 4.9e9),
        ("Ghana", "Africa", 76.0e9),
    ]
    .into_iter()
    .map(|(country, region, gdp)| {
        Record::from([
            ("country".to_string(), Label::from(country)),
            ("region".to_string(), Label::from(region)),
            ("gdp".to_string(), Label::Number(gdp)),
        ])
    })
    .collect();

    let mut view = TableView::new(&spec);
    view.toggle_sort("gdp");
    view.toggle_sort("gdp");
    view.set_filter("region", vec!["Africa".into(), "Americas".into()]);
    let visible = spec.visible_rows(&rows, &view).map_err(io::Error::other)?;

    let widths = spec.column_widths();
    let mut text = String::new();
    let header: Vec<String> = spec
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{} ({w:.0}%)", c.header()))
        .collect();
    text.push_str(&header.join(" | "));
    text.push('\n');
    for i in visible {
        let cells: Vec<String> = spec
            .cells(&rows[i])
            .into_iter()
            .map(|cell| {
                cell.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .collect();
        text.push_str(&cells.join(" | "));
        text.push('\n');
    }
    let path = dir.join("data_table.txt");
    fs::write(&path, text)?;
    tracing::info!(file = %path.display(), "wrote table");
    Ok(())
}
