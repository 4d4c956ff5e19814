//! Backend - Terraform S3 backend configuration descriptor

use std::fmt::Write as _;
use std::str::FromStr;

use serde::Serialize;

/// Where and how Terraform stores its remote state
///
/// Field names match the arguments of Terraform's `s3` backend block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct S3BackendDescriptor {
    pub region: String,
    pub bucket: String,
    pub key: String,
    pub encrypt: bool,
    pub dynamodb_table: String,
}

impl S3BackendDescriptor {
    /// Render as a `*.tf.json` document
    pub fn to_terraform_json(&self) -> serde_json::Result<String> {
        let document = serde_json::json!({
            "terraform": {
                "backend": {
                    "s3": self,
                }
            }
        });
        serde_json::to_string_pretty(&document)
    }

    /// Render as an HCL `terraform { backend "s3" { ... } }` block
    pub fn to_hcl(&self) -> String {
        let mut out = String::new();
        out.push_str("terraform {\n");
        out.push_str("  backend \"s3\" {\n");
        // write! to a String cannot fail
        let _ = writeln!(out, "    region         = {}", quote(&self.region));
        let _ = writeln!(out, "    bucket         = {}", quote(&self.bucket));
        let _ = writeln!(out, "    key            = {}", quote(&self.key));
        let _ = writeln!(out, "    encrypt        = {}", self.encrypt);
        let _ = writeln!(out, "    dynamodb_table = {}", quote(&self.dynamodb_table));
        out.push_str("  }\n");
        out.push_str("}\n");
        out
    }

    /// Render in the requested format
    pub fn render(&self, format: OutputFormat) -> serde_json::Result<String> {
        match format {
            OutputFormat::Json => self.to_terraform_json(),
            OutputFormat::Hcl => Ok(self.to_hcl()),
        }
    }
}

/// Quote a string as an HCL string literal
///
/// Template sequences (`${`, `%{`) are escaped so values are taken literally.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out.replace("${", "$${").replace("%{", "%%{")
}

/// Output format for a rendered backend descriptor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Hcl,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "hcl" | "tf" => Ok(OutputFormat::Hcl),
            other => Err(format!("Unknown output format: {} (expected json or hcl)", other)),
        }
    }
}
