use std::fmt::Display;
use std::fs;
use std::path::PathBuf;
use serde_json::Value;
use crate::error::{GloveError, Result};


/// Hyper parameters of a single optimization run.
#[derive(Clone, Debug)]
pub struct TrainParams {
    pub learning_rate: f64,
    pub factor: f64,
    pub max_iter: usize,
    pub record_every: usize,
    pub batch_size: usize,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.008,
            factor: 100.0,
            max_iter: 3,
            record_every: 3,
            batch_size: 32
        }
    }
}

impl Display for TrainParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "training hyper parameters:
        learning_rate: {},
        factor: {},
        max_iter: {},
        record_every: {},
        batch_size: {}",
        self.learning_rate, self.factor, self.max_iter, self.record_every, self.batch_size
        )
    }
}


#[derive(Clone, Debug)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub plot_file: String,
    pub seed: Option<u64>,
    pub init_dimension: Option<usize>,
    pub save_history: bool,
    pub save_theta: bool,
    pub train: TrainParams,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("files"),
            output_dir: PathBuf::from("."),
            plot_file: "SGD_GD.png".to_string(),
            seed: None,
            init_dimension: None,
            save_history: false,
            save_theta: false,
            train: TrainParams::default()
        }
    }
}

impl Display for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "using hyper-params:
        input_dir: {}
        output_dir: {}
        plot_file: {}
        seed: {:?}
        init_dimension: {:?}
        save_history: {}
        save_theta: {},
        Using {}",
        self.input_dir.display(), self.output_dir.display(), self.plot_file, self.seed,
        self.init_dimension, self.save_history, self.save_theta, self.train)
    }
}


pub struct Config {
    params: RunConfig
}

impl Config {

    pub fn get_params(&self) -> RunConfig {
        return self.params.clone()
    }

    /// No argument runs with the defaults, a single argument is a path to a json
    /// file whose fields override them.
    pub fn new(args: &[String]) -> Result<Config> {

        let json = match args.len() {
            0 | 1 => Value::Object(serde_json::Map::new()),
            2 => {
                let f = fs::File::open(&args[1])?;
                serde_json::from_reader(f)?
            },
            _ => return Err(GloveError::Config("input should be a path to json file only".to_string()))
        };

        Config::from_json(&json)
    }

    pub fn from_json(json: &Value) -> Result<Config> {

        if !json.is_object() {
            return Err(GloveError::Config("configuration must be a json object".to_string()));
        }

        let defaults = RunConfig::default();
        let train = TrainParams {
            learning_rate: get_f64(json, "learning_rate")?.unwrap_or(defaults.train.learning_rate),
            factor: get_f64(json, "factor")?.unwrap_or(defaults.train.factor),
            max_iter: get_usize(json, "max_iter")?.unwrap_or(defaults.train.max_iter),
            record_every: get_usize(json, "record_every")?.unwrap_or(defaults.train.record_every),
            batch_size: get_usize(json, "batch_size")?.unwrap_or(defaults.train.batch_size),
        };

        // sigmoid divides by the factor, the loop takes i % record_every
        if train.factor == 0.0 {
            return Err(GloveError::Config("factor must be non zero".to_string()));
        }
        if train.record_every == 0 || train.batch_size == 0 {
            return Err(GloveError::Config("record_every and batch_size must be positive".to_string()));
        }

        let params = RunConfig {
            input_dir: get_str(json, "input_dir")?.map(PathBuf::from).unwrap_or(defaults.input_dir),
            output_dir: get_str(json, "output_dir")?.map(PathBuf::from).unwrap_or(defaults.output_dir),
            plot_file: get_str(json, "plot_file")?.unwrap_or(defaults.plot_file),
            seed: get_u64(json, "seed")?,
            init_dimension: get_usize(json, "init_dimension")?,
            save_history: get_bool(json, "save_history")?.unwrap_or(defaults.save_history),
            save_theta: get_bool(json, "save_theta")?.unwrap_or(defaults.save_theta),
            train
        };

        Ok( Self { params } )
    }

}

fn invalid(key: &str, kind: &str) -> GloveError {
    GloveError::Config(format!("given {} is not {}", key, kind))
}

fn get_f64(json: &Value, key: &str) -> Result<Option<f64>> {
    match json.get(key) {
        Some(value) => value.as_f64().map(Some).ok_or_else(|| invalid(key, "numeric")),
        None => Ok(None)
    }
}

fn get_u64(json: &Value, key: &str) -> Result<Option<u64>> {
    match json.get(key) {
        Some(value) => value.as_u64().map(Some).ok_or_else(|| invalid(key, "a non negative integer")),
        None => Ok(None)
    }
}

fn get_usize(json: &Value, key: &str) -> Result<Option<usize>> {
    match get_u64(json, key)? {
        Some(v) => usize::try_from(v).map(Some).map_err(|_| invalid(key, "a usize")),
        None => Ok(None)
    }
}

fn get_str(json: &Value, key: &str) -> Result<Option<String>> {
    match json.get(key) {
        Some(value) => value.as_str().map(|s| Some(s.to_owned())).ok_or_else(|| invalid(key, "a string")),
        None => Ok(None)
    }
}

fn get_bool(json: &Value, key: &str) -> Result<Option<bool>> {
    match json.get(key) {
        Some(value) => value.as_bool().map(Some).ok_or_else(|| invalid(key, "boolean")),
        None => Ok(None)
    }
}


pub mod files_handling {

    use std::collections::HashMap;
    use std::fs::{self, File};
    use std::io::BufReader;
    use std::path::Path;
    use ndarray::Array1;
    use ndarray_npy::write_npy;
    use serde::Deserialize;
    use serde::de::DeserializeOwned;
    use serde_json::Value;
    use crate::cooccurrence::CooccurrenceDict;
    use crate::error::{GloveError, Result};
    use crate::theta::DictTheta;
    use crate::train::History;
    use crate::vocabulary::Vocabulary;

    /// `file_path` has no extension, each readable type appends its own.
    pub fn read_input<R: ReadFile>(file_path: &Path) -> Result<<R as ReadFile>::Item> {
        <R as ReadFile>::read_file(file_path)
    }

    pub fn save_output<S: SaveFile + ?Sized>(output_dir: &Path, file_name: &str, item: &S) -> Result<()> {
        fs::create_dir_all(output_dir)?;
        item.save_file(output_dir, file_name)
    }

    pub trait ReadFile {
        type Item;
        fn read_file(file_path: &Path) -> Result<Self::Item>;
    }

    pub trait SaveFile {
        fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<()>;
    }

    /// Reads `{file_path}.json` and deserializes the value under its single top level key.
    fn read_keyed<T: DeserializeOwned>(file_path: &Path, key: &str) -> Result<T> {
        let in_file = file_path.with_extension("json");
        let f = BufReader::new(File::open(&in_file)?);
        let mut json: Value = serde_json::from_reader(f)?;

        let missing = || GloveError::MissingKey { file: in_file.display().to_string(), key: key.to_owned() };
        let value = json.get_mut(key).map(Value::take).ok_or_else(missing)?;
        serde_json::from_value(value).map_err(|_| missing())
    }

    impl ReadFile for Vocabulary {
        type Item = Self;
        fn read_file(file_path: &Path) -> Result<Self::Item> {
            let words: Vec<String> = read_keyed(file_path, "vocabulary")?;
            Vocabulary::new(words)
        }
    }

    impl ReadFile for CooccurrenceDict {
        type Item = Self;
        fn read_file(file_path: &Path) -> Result<Self::Item> {
            let counts: HashMap<String, f64> = read_keyed(file_path, "co_occurrence")?;
            Ok(CooccurrenceDict::new(counts))
        }
    }

    /// Accepted layouts of the stored theta.
    #[derive(Clone, Debug, Deserialize)]
    #[serde(untagged)]
    pub enum ThetaInput {
        Flat(Vec<f64>),
        Nested(Vec<Vec<f64>>),
        Roles {
            central: HashMap<String, Vec<f64>>,
            context: HashMap<String, Vec<f64>>,
        },
    }

    impl ThetaInput {

        /// Flat layout in vocabulary order, dimension checks are left to `PackedTheta`.
        pub fn into_packed(self, vocabulary: &Vocabulary) -> Result<Array1<f64>> {
            match self {
                ThetaInput::Flat(values) => Ok(Array1::from(values)),
                ThetaInput::Nested(rows) => Ok(rows.into_iter().flatten().collect()),
                ThetaInput::Roles { central, context } => {
                    let to_arrays = |vectors: HashMap<String, Vec<f64>>| -> HashMap<String, Array1<f64>> {
                        vectors.into_iter().map(|(word, v)| (word, Array1::from(v))).collect()
                    };
                    let dict = DictTheta { central: to_arrays(central), context: to_arrays(context) };
                    dict.to_packed(vocabulary)
                }
            }
        }

    }

    impl ReadFile for ThetaInput {
        type Item = Self;
        fn read_file(file_path: &Path) -> Result<Self::Item> {
            read_keyed(file_path, "theta")
        }
    }

    impl SaveFile for Array1<f64> {
        fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<()> {
            let out = output_dir.join(file_name).with_extension("npy");
            write_npy(out, self).map_err(|e| GloveError::Npy(e.to_string()))
        }
    }

    impl SaveFile for [History] {
        fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<()> {

            let out = output_dir.join(file_name).with_extension("csv");
            let mut wrt = csv::WriterBuilder::new().from_path(out)?;
            wrt.write_record(["Strategy", "Record", "Minutes", "Cost"])?;

            for history in self {
                for (k, (minutes, cost)) in history.minutes.iter().zip(&history.costs).enumerate() {
                    wrt.serialize((history.strategy.to_string(), k, minutes, cost))?;
                }
            }
            wrt.flush()?;
            Ok(())
        }
    }

}


#[cfg(test)]
mod tests {

    use serde_json::json;
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let params = Config::new(&["glove_compare".to_string()]).unwrap().get_params();
        assert_eq!(params.input_dir, PathBuf::from("files"));
        assert_eq!(params.plot_file, "SGD_GD.png");
        assert_eq!(params.train.learning_rate, 0.008);
        assert_eq!(params.train.factor, 100.0);
        assert_eq!(params.train.max_iter, 3);
        assert_eq!(params.train.record_every, 3);
        assert!(params.seed.is_none());
    }

    #[test]
    fn json_overrides() {
        let json = json!({
            "input_dir": "data",
            "learning_rate": 0.05,
            "max_iter": 10,
            "seed": 42,
            "init_dimension": 8,
            "save_history": true
        });
        let params = Config::from_json(&json).unwrap().get_params();
        assert_eq!(params.input_dir, PathBuf::from("data"));
        assert_eq!(params.train.learning_rate, 0.05);
        assert_eq!(params.train.max_iter, 10);
        assert_eq!(params.train.factor, 100.0);
        assert_eq!(params.seed, Some(42));
        assert_eq!(params.init_dimension, Some(8));
        assert!(params.save_history);
        assert!(!params.save_theta);
    }

    #[test]
    fn bad_values_rejected() {
        assert!(Config::from_json(&json!({"learning_rate": "fast"})).is_err());
        assert!(Config::from_json(&json!({"factor": 0.0})).is_err());
        assert!(Config::from_json(&json!({"record_every": 0})).is_err());
        assert!(Config::from_json(&json!({"max_iter": -1})).is_err());
        assert!(Config::from_json(&json!([1, 2])).is_err());
        let args: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert!(Config::new(&args).is_err());
    }

    #[test]
    fn usize_fields_checked_against_platform_width() {
        let json = json!({"max_iter": u64::MAX});
        let max_iter = get_usize(&json, "max_iter");
        match usize::try_from(u64::MAX) {
            Ok(expected) => assert_eq!(max_iter.unwrap(), Some(expected)),
            Err(_) => assert!(matches!(max_iter, Err(GloveError::Config(_)))),
        }
        assert_eq!(get_usize(&json!({"batch_size": 7}), "batch_size").unwrap(), Some(7));
        assert_eq!(get_usize(&json!({}), "batch_size").unwrap(), None);
    }

}
