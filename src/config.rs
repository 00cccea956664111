use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::Result;
use crate::params::RetrievalParameters;
use crate::types::{DataClass, Format};

#[derive(Debug, Clone, Parser)]
#[command(name = "htsget")]
#[command(version)]
#[command(about = "Download genomic data from an htsget server")]
pub struct Config {
    /// htsget resource URL (e.g., https://example.com/reads/NA12878)
    pub url: String,

    /// Output file (defaults to stdout)
    #[arg(short = 'O', long)]
    pub output: Option<PathBuf>,

    /// Requested data format (BAM, CRAM, VCF, BCF)
    #[arg(short, long)]
    pub format: Option<Format>,

    /// Reference sequence name
    #[arg(short = 'r', long, conflicts_with = "reference_md5")]
    pub reference_name: Option<String>,

    /// MD5 checksum of the reference sequence
    #[arg(short = 'm', long)]
    pub reference_md5: Option<String>,

    /// Start position, 0-based inclusive
    #[arg(short, long)]
    pub start: Option<u64>,

    /// End position, 0-based exclusive
    #[arg(short, long)]
    pub end: Option<u64>,

    /// Comma separated list of fields to include
    #[arg(long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,

    /// Comma separated list of tags to include
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,

    /// Comma separated list of tags to exclude
    #[arg(long, value_delimiter = ',')]
    pub notags: Option<Vec<String>>,

    /// Request only the header or only the body
    #[arg(long)]
    pub data_class: Option<DataClass>,

    /// Timeout in seconds for each HTTP request
    #[arg(long, env = "HTSGET_TIMEOUT", default_value = "5")]
    pub timeout: u64,

    /// Timeout in seconds for receiving the body of one chunk
    #[arg(long, env = "HTSGET_BODY_TIMEOUT", default_value = "300")]
    pub body_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn body_timeout(&self) -> Duration {
        Duration::from_secs(self.body_timeout)
    }

    /// Validated retrieval parameters for this invocation.
    pub fn parameters(&self) -> Result<RetrievalParameters> {
        let mut builder = RetrievalParameters::builder();

        if let Some(format) = self.format {
            builder = builder.format(format);
        }
        if let Some(class) = self.data_class {
            builder = builder.class(class);
        }
        if let Some(name) = &self.reference_name {
            builder = builder.reference_name(name.clone());
        }
        if let Some(md5) = &self.reference_md5 {
            builder = builder.reference_md5(md5.clone());
        }
        if let Some(start) = self.start {
            builder = builder.start(start);
        }
        if let Some(end) = self.end {
            builder = builder.end(end);
        }
        if let Some(fields) = &self.fields {
            builder = builder.fields(fields.iter().cloned());
        }
        if let Some(tags) = &self.tags {
            builder = builder.tags(tags.iter().cloned());
        }
        if let Some(notags) = &self.notags {
            builder = builder.notags(notags.iter().cloned());
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("htsget").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["http://example.com/reads/x"]);
        assert_eq!(config.url, "http://example.com/reads/x");
        assert!(config.output.is_none());
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.body_timeout(), Duration::from_secs(300));
        assert_eq!(config.parameters().unwrap(), RetrievalParameters::default());
    }

    #[test]
    fn test_region_parameters() {
        let config = parse(&[
            "http://example.com/reads/x",
            "-r",
            "chr1",
            "-s",
            "10",
            "-e",
            "20",
            "-f",
            "cram",
            "--data-class",
            "body",
            "-O",
            "out.cram",
        ]);
        let params = config.parameters().unwrap();
        assert_eq!(params.reference_name(), Some("chr1"));
        assert_eq!(params.start(), Some(10));
        assert_eq!(params.end(), Some(20));
        assert_eq!(params.format(), Some(Format::Cram));
        assert_eq!(params.class(), Some(DataClass::Body));
        assert_eq!(config.output, Some(PathBuf::from("out.cram")));
    }

    #[test]
    fn test_list_parameters_split_on_commas() {
        let config = parse(&[
            "http://example.com/reads/x",
            "--fields",
            "QNAME,FLAG",
            "--tags",
            "NM",
            "--notags",
            "MD,OQ",
        ]);
        let params = config.parameters().unwrap();
        assert_eq!(params.fields().unwrap(), ["QNAME", "FLAG"]);
        assert_eq!(params.tags().unwrap(), ["NM"]);
        assert_eq!(params.notags().unwrap(), ["MD", "OQ"]);
    }

    #[test]
    fn test_timeouts_from_flags() {
        let config = parse(&[
            "http://example.com/reads/x",
            "--timeout",
            "2",
            "--body-timeout",
            "30",
        ]);
        assert_eq!(config.timeout(), Duration::from_secs(2));
        assert_eq!(config.body_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_reference_name_conflicts_with_md5() {
        let result = Config::try_parse_from([
            "htsget",
            "http://example.com/reads/x",
            "-r",
            "1",
            "-m",
            "b9185d4fade27aa27e17f25fafec695f",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_range_rejected() {
        let config = parse(&["http://example.com/reads/x", "-s", "20", "-e", "10"]);
        assert!(config.parameters().is_err());
    }
}
