use std::convert::TryInto;
use std::ffi::OsStr;
use std::fs::File;

use justconfig::item::ValueExtractor;
use justconfig::processors::Trim;
use justconfig::sources::env::Env;
use justconfig::sources::text::ConfigText;
use justconfig::ConfPath;
use justconfig::Config;

use crate::config_processors::Unquote;

// Set some default values
const DEFAULT_TRAINING_DATA_PATH: &str = "data/ml-100k/u1.base";
const DEFAULT_TEST_DATA_PATH: &str = "data/ml-100k/u1.test";
const DEFAULT_RATING_FLOOR: f64 = 1.0;
const DEFAULT_RATING_CEILING: f64 = 5.0;

pub struct AppConfig {
    pub log: LogConfig,
    pub data: DataConfig,
    pub model: ModelConfig,
    pub evaluation: EvaluationConfig,
}

pub struct LogConfig {
    pub verbose: bool,
}

pub struct DataConfig {
    pub training_data_path: String,
    pub test_data_path: String,
}

pub struct ModelConfig {
    pub rating_floor: f64,
    pub rating_ceiling: f64,
}

pub struct EvaluationConfig {
    pub num_workers: usize,
    pub predictions_path: String,
}

impl AppConfig {
    pub fn new(config_path: String) -> AppConfig {
        // Initialize config object
        let mut conf = Config::default();

        // Check if there is a config file
        if let Ok(config_file) = File::open(&config_path) {
            let config_text = ConfigText::new(config_file, &config_path)
                .expect("Loading configuration file failed.");
            conf.add_source(config_text);
        }

        // Define config params from environment variables
        let config_env = Env::new(&[
            (
                ConfPath::from(&["data", "training_data_path"]),
                OsStr::new("TRAINING_DATA"),
            ),
            (
                ConfPath::from(&["data", "test_data_path"]),
                OsStr::new("TEST_DATA"),
            ),
            (
                ConfPath::from(&["evaluation", "num_workers"]),
                OsStr::new("NUM_WORKERS"),
            ),
        ]);
        conf.add_source(config_env);

        // Parse into custom config struct
        AppConfig::parse(conf)
    }

    fn parse(conf: justconfig::Config) -> AppConfig {
        AppConfig {
            log: LogConfig::parse(&conf, ConfPath::from(&["log"])),
            data: DataConfig::parse(&conf, ConfPath::from(&["data"])),
            model: ModelConfig::parse(&conf, ConfPath::from(&["model"])),
            evaluation: EvaluationConfig::parse(&conf, ConfPath::from(&["evaluation"])),
        }
    }
}

impl LogConfig {
    fn parse(conf: &Config, path: ConfPath) -> LogConfig {
        LogConfig {
            verbose: conf
                .get(path.push("verbose"))
                .trim()
                .value()
                .unwrap_or(false),
        }
    }
}

impl DataConfig {
    fn parse(conf: &Config, path: ConfPath) -> DataConfig {
        DataConfig {
            training_data_path: conf
                .get(path.push("training_data_path"))
                .unquote()
                .value()
                .unwrap_or_else(|_| String::from(DEFAULT_TRAINING_DATA_PATH)),
            test_data_path: conf
                .get(path.push("test_data_path"))
                .unquote()
                .value()
                .unwrap_or_else(|_| String::from(DEFAULT_TEST_DATA_PATH)),
        }
    }
}

impl ModelConfig {
    fn parse(conf: &Config, path: ConfPath) -> ModelConfig {
        ModelConfig {
            rating_floor: conf
                .get(path.push("rating_floor"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_RATING_FLOOR),
            rating_ceiling: conf
                .get(path.push("rating_ceiling"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_RATING_CEILING),
        }
    }
}

impl EvaluationConfig {
    fn parse(conf: &Config, path: ConfPath) -> EvaluationConfig {
        EvaluationConfig {
            num_workers: conf
                .get(path.push("num_workers"))
                .trim()
                .value()
                // Detect number of CPUs
                .unwrap_or_else(|_| sys_info::cpu_num().unwrap_or_default().try_into().unwrap()),
            predictions_path: conf
                .get(path.push("predictions_path"))
                .unquote()
                .value()
                .unwrap_or_default(),
        }
    }
}
