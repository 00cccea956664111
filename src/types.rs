use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// htsget ticket response per spec 1.3
#[derive(Debug, Deserialize)]
pub struct TicketResponse {
    pub htsget: TicketBody,
}

#[derive(Debug, Deserialize)]
pub struct TicketBody {
    #[serde(default)]
    pub format: Option<String>,
    pub urls: Vec<UrlEntry>,
    #[serde(default)]
    pub md5: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UrlEntry {
    pub url: String,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub class: Option<DataClass>,
}

/// Data formats requestable from an htsget server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Format {
    Bam,
    Cram,
    Vcf,
    Bcf,
    // Extensions beyond spec
    Fasta,
    Fastq,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Bam => "BAM",
            Format::Cram => "CRAM",
            Format::Vcf => "VCF",
            Format::Bcf => "BCF",
            Format::Fasta => "FASTA",
            Format::Fastq => "FASTQ",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BAM" => Ok(Format::Bam),
            "CRAM" => Ok(Format::Cram),
            "VCF" => Ok(Format::Vcf),
            "BCF" => Ok(Format::Bcf),
            "FASTA" => Ok(Format::Fasta),
            "FASTQ" => Ok(Format::Fastq),
            _ => Err(Error::InvalidParameters(format!("unknown format: {}", s))),
        }
    }
}

/// Data class - header only or full data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataClass {
    Body,
    Header,
}

impl DataClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataClass::Body => "body",
            DataClass::Header => "header",
        }
    }
}

impl fmt::Display for DataClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "body" => Ok(DataClass::Body),
            "header" => Ok(DataClass::Header),
            _ => Err(Error::InvalidParameters(format!("unknown data class: {}", s))),
        }
    }
}
