use std::{
    collections::HashSet,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use itertools::Itertools;
use plotly::{
    common::{Font, Line, Mode, Orientation, Title},
    layout::{Axis, AxisType, Legend},
    Configuration, Layout, Plot, Scatter,
};
use rand::Rng;

use crate::{
    config::ViewerConfig,
    data::{ChartData, ChartSeries, ReshapedResultSet},
    defaults::{DEFAULT_REPORT_TITLE, DEFAULT_Y_AXIS_TITLE},
    filter::compile_filters,
    retrieval::retrieve_results,
    source::{BenchmarkSource, GitHubSource},
};

/// Default HTML template used when no custom template is provided.
const DEFAULT_HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{{TITLE}}</title>
    {{PLOTLY_HEAD}}
    <style>{{CUSTOM_CSS}}</style>
</head>
<body>
    <h1>{{TITLE}}</h1>
    <p>{{REPOSITORY}}, generated {{TIMESTAMP}}</p>
    {{CHARTS}}
</body>
</html>"#;

/// Options of the report command besides the output path and source config
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub title: Option<String>,
    pub custom_css: Option<PathBuf>,
    pub template: Option<PathBuf>,
    /// Regular expressions selecting test names
    pub filters: Vec<String>,
}

/// Metadata for rendering report templates
struct ReportMetadata {
    title: String,
    custom_css: String,
    timestamp: String,
    repository: String,
    template: Option<String>,
}

impl ReportMetadata {
    fn new(
        title: Option<String>,
        custom_css: String,
        template: Option<String>,
        config: &ViewerConfig,
    ) -> ReportMetadata {
        ReportMetadata {
            title: title.unwrap_or_else(|| DEFAULT_REPORT_TITLE.to_string()),
            custom_css,
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            repository: format!("{}@{}", config.repository, config.branch),
            template,
        }
    }
}

/// Shape one dataset per test. Each series has exactly one slot per commit;
/// missing and `NaN` measurements become `None`.
pub fn shape_charts(results: &ReshapedResultSet, os_labels: &[String]) -> Vec<ChartData> {
    results
        .iter()
        .map(|(test_name, commit_data)| {
            let commits: Vec<String> = commit_data.keys().cloned().collect();
            let series = os_labels
                .iter()
                .map(|os_label| ChartSeries {
                    label: os_label.clone(),
                    values: commit_data
                        .values()
                        .map(|by_os| by_os.get(os_label).copied().filter(|v| !v.is_nan()))
                        .collect(),
                })
                .collect();
            ChartData {
                test_name: test_name.clone(),
                commits,
                series,
            }
        })
        .collect()
}

/// HTML element id for a chart, unique among `used`
fn chart_element_id(test_name: &str, used: &mut HashSet<String>) -> String {
    let slug: String = test_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let base = format!("chart-{}", slug);

    let mut id = base.clone();
    let mut suffix = 2;
    while used.contains(&id) {
        id = format!("{}-{}", base, suffix);
        suffix += 1;
    }
    used.insert(id.clone());
    id
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn random_line_color() -> String {
    let hue = rand::rng().random_range(0..360);
    format!("hsl({}, 70%, 50%)", hue)
}

/// Formats a value to always include at least one decimal place
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

trait Reporter {
    fn add_chart(&mut self, chart: &ChartData);
    fn as_bytes(&self) -> Result<Vec<u8>>;
}

struct PlotlyReporter {
    // (element id, heading, plot)
    charts: Vec<(String, String, Plot)>,
    used_ids: HashSet<String>,
    metadata: ReportMetadata,
}

impl PlotlyReporter {
    fn new(metadata: ReportMetadata) -> PlotlyReporter {
        PlotlyReporter {
            charts: Vec::new(),
            used_ids: HashSet::new(),
            metadata,
        }
    }

    fn build_plot(chart: &ChartData) -> Plot {
        let config = Configuration::default().responsive(true).fill_frame(false);
        let mut plot = Plot::new();
        plot.set_configuration(config);

        for series in &chart.series {
            let trace = Scatter::new(chart.commits.clone(), series.values.clone())
                .name(&series.label)
                .mode(Mode::LinesMarkers)
                .line(Line::new().color(random_line_color()));
            plot.add_trace(trace);
        }

        let x_axis = Axis::new()
            .title(Title::from("Commit"))
            .tick_angle(45.0)
            .tick_font(Font::new().family("monospace"));
        let y_axis = Axis::new()
            .title(Title::from(DEFAULT_Y_AXIS_TITLE))
            .type_(AxisType::Log);
        let layout = Layout::new()
            .title(Title::from(format!("{} Mean Time", chart.test_name)))
            .x_axis(x_axis)
            .y_axis(y_axis)
            .legend(Legend::new().orientation(Orientation::Horizontal));
        plot.set_layout(layout);

        plot
    }

    fn charts_html(&self) -> String {
        self.charts
            .iter()
            .map(|(id, heading, plot)| {
                format!(
                    "<section class=\"chart\">\n<h2>{}</h2>\n{}\n</section>",
                    escape_html(heading),
                    plot.to_inline_html(Some(id.as_str()))
                )
            })
            .join("\n")
    }
}

impl Reporter for PlotlyReporter {
    fn add_chart(&mut self, chart: &ChartData) {
        let id = chart_element_id(&chart.test_name, &mut self.used_ids);
        self.charts
            .push((id, chart.test_name.clone(), Self::build_plot(chart)));
    }

    fn as_bytes(&self) -> Result<Vec<u8>> {
        let metadata = &self.metadata;
        let template = metadata
            .template
            .as_deref()
            .unwrap_or(DEFAULT_HTML_TEMPLATE);

        let output = template
            .replace("{{TITLE}}", &escape_html(&metadata.title))
            .replace("{{PLOTLY_HEAD}}", &Plot::online_cdn_js())
            .replace("{{CUSTOM_CSS}}", &metadata.custom_css)
            .replace("{{TIMESTAMP}}", &metadata.timestamp)
            .replace("{{REPOSITORY}}", &escape_html(&metadata.repository))
            .replace("{{CHARTS}}", &self.charts_html());

        Ok(output.into_bytes())
    }
}

/// Tab-delimited rows of all present measurements
struct CsvReporter {
    lines: Vec<String>,
}

impl Reporter for CsvReporter {
    fn add_chart(&mut self, chart: &ChartData) {
        for series in &chart.series {
            for (commit, value) in chart.commits.iter().zip(&series.values) {
                if let Some(value) = value {
                    self.lines.push(format!(
                        "{}\t{}\t{}\t{}",
                        chart.test_name,
                        commit,
                        series.label,
                        format_value(*value)
                    ));
                }
            }
        }
    }

    fn as_bytes(&self) -> Result<Vec<u8>> {
        let mut output = self.lines.join("\n");
        if !output.is_empty() {
            output.push('\n');
        }
        Ok(output.into_bytes())
    }
}

/// The chart datasets as JSON; absent slots are `null`
struct JsonReporter {
    charts: Vec<ChartData>,
}

impl Reporter for JsonReporter {
    fn add_chart(&mut self, chart: &ChartData) {
        self.charts.push(chart.clone());
    }

    fn as_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.charts).context("Failed to serialize chart data")
    }
}

struct ReporterFactory {}

impl ReporterFactory {
    fn from_file_name(path: &Path, metadata: ReportMetadata) -> Option<Box<dyn Reporter>> {
        if path == Path::new("-") {
            return Some(Box::new(CsvReporter { lines: Vec::new() }));
        }
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "html" => Some(Box::new(PlotlyReporter::new(metadata))),
            "csv" => Some(Box::new(CsvReporter { lines: Vec::new() })),
            "json" => Some(Box::new(JsonReporter { charts: Vec::new() })),
            _ => None,
        }
    }
}

/// Load template from file
fn load_template(template_path: Option<&PathBuf>) -> Result<Option<String>> {
    let Some(template_path) = template_path else {
        return Ok(None);
    };

    if !template_path.exists() {
        bail!("Template file not found: {}", template_path.display());
    }

    let content = fs::read_to_string(template_path).with_context(|| {
        format!("Failed to read template file {}", template_path.display())
    })?;

    if !content.contains("{{CHARTS}}") {
        log::warn!(
            "Template {} has no {{{{CHARTS}}}} placeholder, the report will contain no charts",
            template_path.display()
        );
    }

    Ok(Some(content))
}

/// Load custom CSS content from file
fn load_custom_css(custom_css_path: Option<&PathBuf>) -> Result<String> {
    let Some(css_path) = custom_css_path else {
        return Ok(String::new());
    };

    if !css_path.exists() {
        bail!("Custom CSS file not found: {}", css_path.display());
    }

    fs::read_to_string(css_path)
        .with_context(|| format!("Failed to read custom CSS file {}", css_path.display()))
}

/// Fetch all result files from the configured repository and write a report.
pub fn report(output: PathBuf, config: &ViewerConfig, options: ReportOptions) -> Result<()> {
    let source = GitHubSource::new(config)?;
    report_from_source(&source, output, config, options)
}

/// Fetch all result files from `source` and write a report to `output`.
///
/// The format follows the file extension (`html`, `csv`, `json`); `-` writes
/// CSV to stdout. Nothing is written if fetching fails.
pub fn report_from_source(
    source: &dyn BenchmarkSource,
    output: PathBuf,
    config: &ViewerConfig,
    options: ReportOptions,
) -> Result<()> {
    let filters = compile_filters(&options.filters)?;
    let template = load_template(options.template.as_ref())?;
    let custom_css = load_custom_css(options.custom_css.as_ref())?;
    let metadata = ReportMetadata::new(options.title, custom_css, template, config);

    let mut reporter = ReporterFactory::from_file_name(&output, metadata)
        .ok_or_else(|| anyhow!("Could not infer output format from {}", output.display()))?;

    let results = retrieve_results(source, config, &filters)?;
    if results.is_empty() {
        log::warn!("No benchmark measurements found in {}", config.repository);
    }

    for chart in shape_charts(&results, &config.os_labels) {
        reporter.add_chart(&chart);
    }

    let bytes = reporter.as_bytes()?;
    if output == Path::new("-") {
        io::stdout()
            .write_all(&bytes)
            .context("Could not write to stdout")?;
    } else {
        File::create(&output)
            .and_then(|mut file| file.write_all(&bytes))
            .with_context(|| format!("Could not write report to {}", output.display()))?;
        log::info!("Wrote report to {}", output.display());
    }

    Ok(())
}
