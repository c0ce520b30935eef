pub struct Config {
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "4040".to_string())
            .parse::<u16>()
            .map_err(|_| "PORT must be a number")?;

        Ok(Self { port })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port() {
        // Only read when PORT is absent from the environment
        if std::env::var("PORT").is_err() {
            assert_eq!(Config::from_env().unwrap().port, 4040);
        }
    }
}
