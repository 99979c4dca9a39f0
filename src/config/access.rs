use super::*;
use crate::resolver::Occurrence;

impl SectionConfig {
    /// Look up a key or a section by its full path.
    ///
    /// The root's own name may lead the path and a trailing separator is
    /// ignored, so `Sampler/parameter1`, `toplevel/Sampler/parameter1` and
    /// `Sampler/parameter1/` all name the same section.
    ///
    /// # Examples
    /// ```no_run
    /// # use section_cfg::SectionConfig;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = SectionConfig::from_file("detector.cfg")?;
    /// let min = config.lookup("Sampler/parameter1/min")?;
    /// let same = config.lookup("Sampler")?.lookup("parameter1")?.lookup("min")?;
    /// assert_eq!(min, same);
    /// # Ok(())
    /// # }
    /// ```
    pub fn lookup(&self, path: &str) -> Result<Entry<'_>, ConfigError> {
        let sep = self.options.separator;
        let trimmed = path.trim().trim_end_matches(sep);

        let relative = match trimmed.split_once(sep) {
            Some((first, rest)) if first.trim() == self.name() && self.root.get(first.trim()).is_none() => rest,
            None if trimmed == self.name() && self.root.get(trimmed).is_none() => "",
            _ => trimmed,
        };

        self.root.lookup(relative).map_err(|_| ConfigError::PathNotFound {
            path: path.to_string(),
        })
    }

    /// Like [`lookup`](Self::lookup), but the path must end at a key.
    pub fn lookup_value(&self, path: &str) -> Result<&Value, ConfigError> {
        match self.lookup(path)? {
            Entry::Value(value) => Ok(value),
            Entry::Section(_) => Err(ConfigError::TypeError {
                path: path.to_string(),
                message: "Expected a value, found a section".into(),
            }),
        }
    }

    /// Value of the only leaf key called `name`, wherever it is in the tree.
    pub fn lookup_unique(&self, name: &str) -> Result<&Value, ConfigError> {
        self.index.lookup_unique(name)
    }

    /// Every place a leaf key called `name` is defined, in file order.
    pub fn find(&self, name: &str) -> &[Occurrence] {
        self.index.occurrences(name)
    }

    /// Get a typed value by full path.
    ///
    /// # Examples
    /// ```no_run
    /// # use section_cfg::SectionConfig;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = SectionConfig::from_file("detector.cfg")?;
    /// let width: i64 = config.get("detectors/width")?;
    /// let height: f64 = config.get("detectors/det1/height")?;
    /// let name: String = config.get("Sampler/sampler_name")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn get<T>(&self, path: &str) -> Result<T, ConfigError>
    where
        T: TryFrom<Value, Error = ConfigError>,
    {
        helpers::convert(self.lookup_value(path)?, path)
    }

    /// Get a typed value through the unique-name shortcut.
    pub fn get_unique<T>(&self, name: &str) -> Result<T, ConfigError>
    where
        T: TryFrom<Value, Error = ConfigError>,
    {
        helpers::convert(self.lookup_unique(name)?, name)
    }

    /// `None` if the path doesn't exist; a present value of the wrong type is still an error.
    pub fn get_optional<T>(&self, path: &str) -> Result<Option<T>, ConfigError>
    where
        T: TryFrom<Value, Error = ConfigError>,
    {
        match self.get(path) {
            Ok(value) => Ok(Some(value)),
            Err(ConfigError::PathNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get a value with a fallback default.
    ///
    /// # Examples
    /// ```no_run
    /// # use section_cfg::SectionConfig;
    /// # let config = SectionConfig::from_file("detector.cfg").unwrap();
    /// let width = config.get_or("detectors/width", 1i64);
    /// let verbose = config.get_or("verbose", false);
    /// ```
    pub fn get_or<T>(&self, path: &str, default: T) -> T
    where
        T: TryFrom<Value, Error = ConfigError>,
    {
        self.get(path).unwrap_or(default)
    }

    /// Check whether a key or section exists at `path`.
    pub fn has(&self, path: &str) -> bool {
        self.lookup(path).is_ok()
    }

    /// Keys stored directly on the root, outside any section.
    pub fn keys(&self) -> Vec<&str> {
        self.root.keys()
    }
}
