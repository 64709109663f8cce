use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply `AAAS_*` overrides read through `lookup`. Empty or unparsable
    /// values are ignored.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("AAAS_RATE_LIMIT_ANON")
            && let Ok(limit) = raw.trim().parse::<u64>()
        {
            self.admission.anon_limit = limit;
        }

        if let Some(raw) = lookup("AAAS_RATE_LIMIT_AUTHED")
            && let Ok(limit) = raw.trim().parse::<u64>()
        {
            self.admission.authed_limit = limit;
        }

        if let Some(raw) = lookup("AAAS_COUNTER_STORE")
            && let Ok(kind) = raw.trim().parse()
        {
            self.admission.store = kind;
        }

        if let Some(path) = lookup("AAAS_SQLITE_PATH")
            && !path.is_empty()
        {
            self.admission.sqlite_path = path;
        }

        if let Some(model) = lookup("AAAS_MODEL")
            && !model.is_empty()
        {
            self.generation.model = model;
        }

        if let Some(level) = lookup("AAAS_LOG_LEVEL")
            && !level.is_empty()
        {
            self.log_level = level;
        }
    }
}
