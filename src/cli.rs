use crate::domain::constants::{AGE_MAX, AGE_MIN, EXPERIENCE_MAX, EXPERIENCE_MIN};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rvl",
    version,
    about = "Runtime Verification Layer CLI: shadow-twin bias checks and fairness dashboard"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        env = "RVL_BASE_URL",
        help = "Verification service base URL (default http://localhost:8000)"
    )]
    pub base_url: Option<String>,
    #[arg(
        long,
        global = true,
        env = "RVL_TIMEOUT_MS",
        help = "Per-request timeout in milliseconds"
    )]
    pub timeout_ms: Option<u64>,
    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,
    #[arg(long, global = true, help = "Only log errors")]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a candidate profile and show the decision with its runtime audit
    Predict {
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u8).range(AGE_MIN..=AGE_MAX))]
        age: u8,
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(EXPERIENCE_MIN..=EXPERIENCE_MAX))]
        experience: u8,
        #[arg(long, value_enum, default_value_t = Education::Bachelors)]
        education: Education,
        #[arg(long, value_enum, default_value_t = Gender::Male)]
        gender: Gender,
        #[arg(long, help = "Cosmetic delay before revealing the result (text mode)")]
        reveal_delay_ms: Option<u64>,
    },
    /// Historical bias audit of a dataset
    Audit {
        #[command(subcommand)]
        command: AuditCommands,
    },
    /// Fetch synthetic candidate rows
    Generate {
        #[arg(long)]
        samples: Option<u32>,
        #[arg(long, help = "Write rows as a JSON array instead of printing them")]
        output: Option<PathBuf>,
    },
    /// Screen one batch of rows for distribution drift
    Screen {
        #[arg(long)]
        file: PathBuf,
    },
    /// Simulated live stream: generate, optionally shift, and screen batches
    Stream {
        #[arg(long)]
        interval_ms: Option<u64>,
        #[arg(long)]
        batch_size: Option<u32>,
        #[arg(long, help = "Stop after this many batches (default: run until interrupted)")]
        batches: Option<u64>,
        #[arg(long)]
        drift_probability: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        drift_shift: Option<f64>,
    },
    /// Show the accumulated bias scorecard
    Report {
        #[arg(long, help = "Also save the scorecard to this file")]
        output: Option<PathBuf>,
    },
    /// Probe the verification layer and dashboard endpoints
    Status,
    /// Show recently recorded actions
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuditCommands {
    /// Upload a CSV or JSON dataset
    Upload { file: PathBuf },
    /// Generate synthetic data and audit it
    Generate {
        #[arg(long)]
        samples: Option<u32>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(into = "u8", try_from = "u8")]
pub enum Education {
    Bachelors,
    Masters,
    Phd,
}

impl From<Education> for u8 {
    fn from(e: Education) -> u8 {
        match e {
            Education::Bachelors => 1,
            Education::Masters => 2,
            Education::Phd => 3,
        }
    }
}

impl TryFrom<u8> for Education {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Education::Bachelors),
            2 => Ok(Education::Masters),
            3 => Ok(Education::Phd),
            other => Err(format!("unknown education level: {}", other)),
        }
    }
}

impl Education {
    pub fn label(self) -> &'static str {
        match self {
            Education::Bachelors => "Bachelor's",
            Education::Masters => "Master's",
            Education::Phd => "PhD",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(into = "u8", try_from = "u8")]
pub enum Gender {
    Male,
    Female,
}

impl From<Gender> for u8 {
    fn from(g: Gender) -> u8 {
        match g {
            Gender::Male => 0,
            Gender::Female => 1,
        }
    }
}

impl TryFrom<u8> for Gender {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Gender::Male),
            1 => Ok(Gender::Female),
            other => Err(format!("unknown gender code: {}", other)),
        }
    }
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_defaults_match_the_form() {
        let cli = Cli::try_parse_from(["rvl", "predict"]).unwrap();
        match cli.command {
            Commands::Predict {
                age,
                experience,
                education,
                gender,
                ..
            } => {
                assert_eq!(age, 30);
                assert_eq!(experience, 5);
                assert_eq!(education, Education::Bachelors);
                assert_eq!(gender, Gender::Male);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn predict_rejects_out_of_range_sliders() {
        assert!(Cli::try_parse_from(["rvl", "predict", "--age", "17"]).is_err());
        assert!(Cli::try_parse_from(["rvl", "predict", "--age", "71"]).is_err());
        assert!(Cli::try_parse_from(["rvl", "predict", "--experience", "41"]).is_err());
        assert!(Cli::try_parse_from(["rvl", "predict", "--age", "70", "--experience", "40"]).is_ok());
    }

    #[test]
    fn stream_accepts_a_negative_drift_shift() {
        let cli = Cli::try_parse_from(["rvl", "stream", "--drift-shift", "-2.5"]).unwrap();
        match cli.command {
            Commands::Stream { drift_shift, .. } => assert_eq!(drift_shift, Some(-2.5)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn education_codes_round_trip() {
        for e in [Education::Bachelors, Education::Masters, Education::Phd] {
            assert_eq!(Education::try_from(u8::from(e)), Ok(e));
        }
        assert!(Education::try_from(0).is_err());
        assert!(Gender::try_from(2).is_err());
    }
}
