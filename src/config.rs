use crate::Result;
use crate::errors::Error;

pub fn get(name: &str) -> Result<String> {
    stellest_common::config::get(name).map_err(|err| Error::Configuration {
        key: name.to_string(),
        message: err.to_string(),
    })
}
