//! Template Method: `ReportExporter::export` fixes the skeleton (header,
//! one call per row, footer); exporters fill in the hooks. `JsonExporter`
//! shows the other option, overriding the template itself.

use crate::catalog::DemoContext;
use crate::error::{PatternError, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRow {
    pub region: String,
    pub product: String,
    pub units: u32,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub title: String,
    pub rows: Vec<SalesRow>,
}

impl Report {
    pub fn total_revenue(&self) -> f64 {
        self.rows.iter().map(|r| r.revenue).sum()
    }
}

pub const COLUMNS: [&str; 4] = ["region", "product", "units", "revenue"];

pub trait ReportExporter {
    fn name(&self) -> &'static str;
    fn header(&self, report: &Report) -> Result<String>;
    fn row(&self, row: &SalesRow) -> Result<String>;

    fn footer(&self, _report: &Report) -> Result<String> {
        Ok(String::new())
    }

    /// The template. Exporters normally leave this alone.
    fn export(&self, report: &Report) -> Result<String> {
        if report.title.trim().is_empty() {
            return Err(PatternError::Validation("report needs a title".into()));
        }
        let mut out = self.header(report)?;
        for row in &report.rows {
            out.push_str(&self.row(row)?);
        }
        out.push_str(&self.footer(report)?);
        tracing::debug!(exporter = self.name(), bytes = out.len(), "report exported");
        Ok(out)
    }
}

pub struct CsvExporter;

impl CsvExporter {
    fn record<I, S>(fields: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(fields)?;
        let bytes = writer
            .into_inner()
            .map_err(|e| PatternError::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| PatternError::Validation(e.to_string()))
    }
}

impl ReportExporter for CsvExporter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn header(&self, _report: &Report) -> Result<String> {
        Self::record(COLUMNS)
    }

    fn row(&self, row: &SalesRow) -> Result<String> {
        Self::record([
            row.region.clone(),
            row.product.clone(),
            row.units.to_string(),
            format!("{:.2}", row.revenue),
        ])
    }
}

pub struct HtmlExporter;

impl ReportExporter for HtmlExporter {
    fn name(&self) -> &'static str {
        "html"
    }

    fn header(&self, report: &Report) -> Result<String> {
        let cells: String = COLUMNS.iter().map(|c| format!("<th>{c}</th>")).collect();
        Ok(format!(
            "<h1>{}</h1>\n<table>\n<tr>{cells}</tr>\n",
            html_escape::encode_text(&report.title)
        ))
    }

    fn row(&self, row: &SalesRow) -> Result<String> {
        Ok(format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>\n",
            html_escape::encode_text(&row.region),
            html_escape::encode_text(&row.product),
            row.units,
            row.revenue
        ))
    }

    fn footer(&self, report: &Report) -> Result<String> {
        Ok(format!(
            "<tr><td colspan=\"3\">Total</td><td>{:.2}</td></tr>\n</table>\n",
            report.total_revenue()
        ))
    }
}

pub struct MarkdownExporter;

impl ReportExporter for MarkdownExporter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn header(&self, report: &Report) -> Result<String> {
        Ok(format!(
            "# {}\n\n| {} |\n|{}\n",
            report.title,
            COLUMNS.join(" | "),
            "---|".repeat(COLUMNS.len())
        ))
    }

    fn row(&self, row: &SalesRow) -> Result<String> {
        Ok(format!(
            "| {} | {} | {} | {:.2} |\n",
            row.region.replace('|', "\\|"),
            row.product.replace('|', "\\|"),
            row.units,
            row.revenue
        ))
    }

    fn footer(&self, report: &Report) -> Result<String> {
        Ok(format!("\n**Total revenue:** {:.2}\n", report.total_revenue()))
    }
}

pub struct JsonExporter;

impl ReportExporter for JsonExporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn header(&self, _report: &Report) -> Result<String> {
        Ok(String::new())
    }

    fn row(&self, row: &SalesRow) -> Result<String> {
        Ok(serde_json::to_string(row)?)
    }

    // A JSON document is not header + rows + footer; replace the template.
    fn export(&self, report: &Report) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

pub fn sample_report() -> Report {
    let row = |region: &str, product: &str, units, revenue| SalesRow {
        region: region.into(),
        product: product.into(),
        units,
        revenue,
    };
    Report {
        title: "Q3 Sales <draft>".into(),
        rows: vec![
            row("EMEA", "Widgets & Gadgets", 120, 3_480.0),
            row("APAC", "Sprockets", 75, 1_912.5),
            row("AMER", "Gizmos", 240, 7_200.0),
        ],
    }
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    let report = sample_report();
    let exporters: [&dyn ReportExporter; 4] = [&CsvExporter, &HtmlExporter, &MarkdownExporter, &JsonExporter];
    for exporter in exporters {
        ctx.section(exporter.name());
        print!("{}", exporter.export(&report)?);
        println!();
    }

    let untitled = Report {
        title: " ".into(),
        rows: Vec::new(),
    };
    if let Err(err) = CsvExporter.export(&untitled) {
        println!("untitled report: {err}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_quotes_fields() {
        let out = CsvExporter.export(&sample_report()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "region,product,units,revenue");
        assert_eq!(lines[1], "EMEA,Widgets & Gadgets,120,3480.00");
        assert_eq!(lines.len(), 4);

        let tricky = Report {
            title: "t".into(),
            rows: vec![SalesRow {
                region: "North, East".into(),
                product: "p".into(),
                units: 1,
                revenue: 1.0,
            }],
        };
        assert!(CsvExporter.export(&tricky).unwrap().contains("\"North, East\""));
    }

    #[test]
    fn test_html_escapes() {
        let out = HtmlExporter.export(&sample_report()).unwrap();
        assert!(out.contains("<h1>Q3 Sales &lt;draft&gt;</h1>"));
        assert!(out.contains("Widgets &amp; Gadgets"));
        assert!(out.contains("<td>12592.50</td>"));
    }

    #[test]
    fn test_markdown_table() {
        let out = MarkdownExporter.export(&sample_report()).unwrap();
        assert!(out.starts_with("# Q3 Sales <draft>\n\n| region | product | units | revenue |\n|---|---|---|---|\n"));
        assert!(out.contains("| APAC | Sprockets | 75 | 1912.50 |"));
    }

    #[test]
    fn test_json_overrides_template() {
        let out = JsonExporter.export(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["rows"].as_array().unwrap().len(), 3);
        assert_eq!(value["rows"][2]["units"], 240);
    }

    #[test]
    fn test_template_rejects_untitled() {
        let report = Report {
            title: String::new(),
            rows: Vec::new(),
        };
        assert!(CsvExporter.export(&report).is_err());
        assert!(MarkdownExporter.export(&report).is_err());
    }
}
