use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use lab_catalog::{
    Catalog, Demographics, LineItem, LineItems, ObservedResults, PatientDemographics,
};
use lab_core::{
    format_amount, BillingDefaults, InvoiceAdjustments, InvoiceTotalsCalculator, LabConfig,
    LabReport, LabelStyle, ReferenceRangeResolver,
};
use std::error::Error;
use std::path::{Path, PathBuf};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "labdesk")]
#[command(about = "LabDesk laboratory billing and reporting CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the reference ranges of a test for a patient
    Resolve {
        /// Catalog file (JSON, or YAML by .yaml/.yml extension)
        #[arg(long)]
        catalog: PathBuf,
        /// Test code
        #[arg(long)]
        test: String,
        /// Patient age in years
        #[arg(long, conflicts_with = "birth_date")]
        age: Option<f64>,
        /// Patient date of birth (YYYY-MM-DD)
        #[arg(long)]
        birth_date: Option<NaiveDate>,
        /// Patient gender
        #[arg(long)]
        gender: Option<String>,
        /// Fallback label preset (full or abbreviated)
        #[arg(long)]
        labels: Option<LabelStyle>,
    },
    /// Calculate invoice totals
    Invoice {
        /// Line items file (JSON or YAML)
        #[arg(long, conflicts_with_all = ["catalog", "tests"])]
        items: Option<PathBuf>,
        /// Catalog file used to price --tests
        #[arg(long, requires = "tests")]
        catalog: Option<PathBuf>,
        /// Test codes (comma-separated)
        #[arg(long, requires = "catalog", value_delimiter = ',')]
        tests: Vec<String>,
        /// Discount percentage (defaults to LABDESK_DISCOUNT_PERCENT)
        #[arg(long)]
        discount: Option<f64>,
        /// GST percentage (defaults to LABDESK_DEFAULT_GST)
        #[arg(long)]
        gst: Option<f64>,
        /// Additional charges (defaults to LABDESK_ADDITIONAL_CHARGES)
        #[arg(long)]
        additional: Option<f64>,
    },
    /// Print a lab report
    Report {
        /// Catalog file
        #[arg(long)]
        catalog: PathBuf,
        /// Patient record file (JSON or YAML with age and gender)
        #[arg(long)]
        patient: PathBuf,
        /// Observed results file (JSON or YAML)
        #[arg(long)]
        results: PathBuf,
        /// Patient name printed on the report
        #[arg(long)]
        name: String,
        /// Fallback label preset (full or abbreviated)
        #[arg(long)]
        labels: Option<LabelStyle>,
    },
    /// Show the effective billing defaults
    Defaults,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = LabConfig::from_lookup(|key| std::env::var(key).ok())?;

    match cli.command {
        Some(Commands::Resolve {
            catalog,
            test,
            age,
            birth_date,
            gender,
            labels,
        }) => {
            let patient = match birth_date {
                Some(dob) => PatientDemographics::from_birth_date(
                    dob,
                    Utc::now().date_naive(),
                    gender.as_deref(),
                ),
                None => PatientDemographics::new(age, gender.as_deref()),
            };
            let style = labels.unwrap_or(cfg.label_style());
            print!("{}", resolve_command(&catalog, &test, &patient, style)?);
        }
        Some(Commands::Invoice {
            items,
            catalog,
            tests,
            discount,
            gst,
            additional,
        }) => {
            let line_items = match (items, catalog) {
                (Some(path), _) => read_line_items(&path)?,
                (None, Some(path)) => Catalog::load(&path)?.line_items(tests.as_slice())?,
                (None, None) => {
                    return Err("either --items or --catalog with --tests is required".into())
                }
            };
            let adjustments = InvoiceAdjustments {
                discount_percent: discount,
                gst_percent: gst,
                additional_charges: additional,
            };
            print!("{}", invoice_command(&line_items, &adjustments, cfg.billing()));
        }
        Some(Commands::Report {
            catalog,
            patient,
            results,
            name,
            labels,
        }) => {
            let style = labels.unwrap_or(cfg.label_style());
            let report = report_command(&catalog, &patient, &results, &name, style)?;
            print!("{}", report.render_text());
        }
        Some(Commands::Defaults) => {
            print!("{}", defaults_command(&cfg));
        }
        None => {
            println!("Use 'labdesk --help' for commands");
        }
    }

    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn read_line_items(path: &Path) -> CliResult<Vec<LineItem>> {
    let text = std::fs::read_to_string(path)?;
    let items = if is_yaml(path) {
        LineItems::parse_yaml(&text)?
    } else {
        LineItems::parse_json(&text)?
    };
    Ok(items)
}

fn resolve_command(
    catalog_path: &Path,
    code: &str,
    patient: &PatientDemographics,
    style: LabelStyle,
) -> CliResult<String> {
    let catalog = Catalog::load(catalog_path)?;
    let test = catalog
        .find(code)
        .ok_or_else(|| format!("unknown test code '{code}'"))?;

    let resolver = ReferenceRangeResolver::new(style);
    let mut out = format!("{} ({})\n", test.name, test.code);
    for parameter in &test.parameters {
        let range = resolver.resolve(parameter.reference_range.as_ref(), patient);
        let unit = parameter.unit.as_deref().unwrap_or_default();
        let line = format!("{}: {} {}", parameter.name, range, unit);
        out.push_str(&format!("  {}\n", line.trim_end()));
    }
    Ok(out)
}

fn invoice_command(
    line_items: &[LineItem],
    adjustments: &InvoiceAdjustments,
    defaults: BillingDefaults,
) -> String {
    let calculator = InvoiceTotalsCalculator::new(defaults);
    let effective = adjustments.with_defaults(defaults);
    let totals = calculator.calculate(line_items, adjustments).display();

    let mut out = String::new();
    for item in line_items {
        let label = item
            .name
            .as_deref()
            .or(item.code.as_deref())
            .unwrap_or("(unnamed)");
        out.push_str(&format!("{label:<32} {:>12}\n", format_amount(item.price)));
    }
    out.push_str(&format!("{:<32} {:>12}\n", "Subtotal", totals.subtotal));
    out.push_str(&format!(
        "{:<32} {:>12}\n",
        format!("Discount ({}%)", effective.discount_percent),
        totals.discount_amount
    ));
    out.push_str(&format!(
        "{:<32} {:>12}\n",
        format!("GST ({}%)", effective.gst_percent),
        totals.gst_amount
    ));
    out.push_str(&format!(
        "{:<32} {:>12}\n",
        "Additional charges", totals.additional_charges
    ));
    out.push_str(&format!("{:<32} {:>12}\n", "Total", totals.total));
    out
}

fn report_command(
    catalog_path: &Path,
    patient_path: &Path,
    results_path: &Path,
    name: &str,
    style: LabelStyle,
) -> CliResult<LabReport> {
    let catalog = Catalog::load(catalog_path)?;

    let patient_text = std::fs::read_to_string(patient_path)?;
    let patient = if is_yaml(patient_path) {
        Demographics::parse_yaml(&patient_text)?
    } else {
        Demographics::parse_json(&patient_text)?
    };

    let results_text = std::fs::read_to_string(results_path)?;
    let results = if is_yaml(results_path) {
        ObservedResults::parse_yaml(&results_text)?
    } else {
        ObservedResults::parse_json(&results_text)?
    };

    Ok(LabReport::from_catalog(
        name,
        &patient,
        &catalog,
        &results,
        style,
        Utc::now(),
    )?)
}

fn defaults_command(cfg: &LabConfig) -> String {
    let billing = cfg.billing();
    format!(
        "GST: {}%\nDiscount: {}%\nAdditional charges: {}\nRange labels: {}\n",
        billing.gst_percent,
        billing.discount_percent,
        format_amount(billing.additional_charges),
        cfg.label_style()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_YAML: &str = r#"tests:
  - code: CBC
    name: Complete Blood Count
    price: 100
    parameters:
      - name: Haemoglobin
        unit: g/dL
        normalRange:
          male: { min: 13, max: 17 }
      - name: Platelets
        referenceRange: "150000-410000"
  - code: LFT
    name: Liver Function Test
    price: 50
"#;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    #[test]
    fn resolve_lists_each_parameter() {
        let dir = tempfile::tempdir().expect("temp dir");
        let catalog = write(dir.path(), "catalog.yaml", CATALOG_YAML);
        let patient = PatientDemographics::new(Some(30.0), Some("female"));

        let out = resolve_command(&catalog, "cbc", &patient, LabelStyle::Abbreviated)
            .expect("resolve");
        assert_eq!(
            out,
            "Complete Blood Count (CBC)\n  Haemoglobin: M: 13 - 17 g/dL\n  Platelets: 150000-410000\n"
        );
    }

    #[test]
    fn resolve_rejects_unknown_test() {
        let dir = tempfile::tempdir().expect("temp dir");
        let catalog = write(dir.path(), "catalog.yaml", CATALOG_YAML);
        let err = resolve_command(
            &catalog,
            "TSH",
            &PatientDemographics::default(),
            LabelStyle::Full,
        )
        .expect_err("unknown code");
        assert!(err.to_string().contains("TSH"));
    }

    #[test]
    fn invoice_prints_totals_with_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let catalog_path = write(dir.path(), "catalog.yaml", CATALOG_YAML);
        let items = Catalog::load(&catalog_path)
            .expect("load catalog")
            .line_items(&["CBC", "LFT"])
            .expect("known codes");
        let defaults = BillingDefaults::new(18.0, 10.0, 20.0).expect("valid defaults");

        let out = invoice_command(&items, &InvoiceAdjustments::default(), defaults);
        assert!(out.contains("Complete Blood Count"));
        assert!(out.contains("Discount (10%)"));
        assert!(out.contains("15.00"));
        assert!(out.contains("24.30"));
        assert!(out.lines().last().expect("total line").ends_with("179.30"));
    }

    #[test]
    fn invoice_reads_items_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write(dir.path(), "items.json", r#"[{"name": "Visit", "price": "40"}]"#);
        let items = read_line_items(&path).expect("read items");
        assert_eq!(items[0].price, 40.0);
    }

    #[test]
    fn report_reads_all_inputs() {
        let dir = tempfile::tempdir().expect("temp dir");
        let catalog = write(dir.path(), "catalog.yaml", CATALOG_YAML);
        let patient = write(dir.path(), "patient.json", r#"{"age": 40, "gender": "Male"}"#);
        let results = write(
            dir.path(),
            "results.yaml",
            "- test: CBC\n  parameter: Haemoglobin\n  value: 14.2\n",
        );

        let report = report_command(&catalog, &patient, &results, "Ravi", LabelStyle::Full)
            .expect("build report");
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].reference_range, "13 - 17");
        assert_eq!(report.rows[0].value, "14.2");
    }

    #[test]
    fn defaults_show_configuration() {
        let cfg = LabConfig::new(
            BillingDefaults::new(18.0, 0.0, 25.0).expect("valid defaults"),
            LabelStyle::Abbreviated,
        );
        let out = defaults_command(&cfg);
        assert!(out.contains("GST: 18%"));
        assert!(out.contains("Additional charges: 25.00"));
        assert!(out.contains("Range labels: abbreviated"));
    }

    #[test]
    fn cli_parses_invoice_arguments() {
        let cli = Cli::try_parse_from([
            "labdesk",
            "invoice",
            "--catalog",
            "catalog.yaml",
            "--tests",
            "CBC,LFT",
            "--gst",
            "5",
        ])
        .expect("valid arguments");
        match cli.command {
            Some(Commands::Invoice { tests, gst, .. }) => {
                assert_eq!(tests, vec!["CBC", "LFT"]);
                assert_eq!(gst, Some(5.0));
            }
            _ => panic!("expected invoice command"),
        }
    }
}
