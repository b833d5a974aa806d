//! A parser for collecting commands and flags from a command line.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::str::FromStr;

use crate::scanner::Scanner;

/// Defines the possible errors that may occur during parsing of a command line.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// A positional token is not an identifier.
    #[error("expected command name")]
    MissingCommand,

    /// A `-` is not followed by a flag name.
    #[error("expected flag name after '-'")]
    MissingFlagKey,

    /// A `-key=` is not followed by a value.
    #[error("expected value after '=' for flag `{0}`")]
    MissingFlagValue(String),

    /// The flag value cannot be converted to the destination type. This could mean that there
    /// is a missing implementation for [`str::parse`] trait.
    #[error("invalid argument")]
    InvalidArgument,
}

/// Defines a flag found on the command line, with every value it was given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Flag {
    key: String,
    value: String,
    values: Vec<String>,
}

impl Flag {
    fn new(key: &str) -> Self {
        Flag {
            key: key.to_string(),
            ..Default::default()
        }
    }

    /// The flag name, without the leading `-`.
    #[inline(always)]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The last value given to the flag, empty if it never had one.
    #[inline(always)]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Every value given to the flag, in order of appearance.
    #[inline(always)]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Evaluate if the flag was given at least one value.
    #[inline(always)]
    pub fn has_value(&self) -> bool {
        !self.values.is_empty()
    }

    fn push(&mut self, value: &str) {
        // Presence only.
        if value.is_empty() {
            return;
        }

        self.values.push(value.to_string());
        self.value = value.to_string();
    }
}

/// Defines the result of command line parsing: the positional commands, followed by a look-up
/// over parsed flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Commandline {
    commands: Vec<String>,
    flags: Vec<Flag>,
}

impl Commandline {
    /// Parse a whole command line such as `build release -target=onion -v`.
    ///
    /// Identifiers before the first `-` are commands. Everything after it is a sequence of
    /// `key`, `key=value` or `key="quoted value"` flags, each introduced by a `-`. A repeated key
    /// accumulates its values. The first token without a `-` ends the flags and the rest of the
    /// text is ignored.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut scanner = Scanner::new(text);

        let mut out = Self::default();

        while scanner.whitespace() {
            if scanner.keyword("-") {
                break;
            }

            let Some(command) = scanner.identifier() else {
                #[cfg(feature = "defmt")]
                defmt::warn!("expected command name at line {=u32}", scanner.line());

                return Err(Error::MissingCommand);
            };

            out.commands.push(command.to_string());
        }

        // The first dash has been eaten by the loop above.
        let mut dashed = true;

        while scanner.whitespace() {
            // Every flag after the first one needs its own dash. Anything else ends the flags.
            if !dashed && !scanner.keyword("-") {
                #[cfg(feature = "defmt")]
                defmt::trace!("end of flags at line {=u32}", scanner.line());

                break;
            }

            dashed = false;

            let Some(key) = scanner.identifier() else {
                #[cfg(feature = "defmt")]
                defmt::warn!("expected flag name after '-' at line {=u32}", scanner.line());

                return Err(Error::MissingFlagKey);
            };

            let mut value = "";
            if scanner.keyword("=") {
                value = match scanner.string("") {
                    Some(value) => value,
                    None => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("expected value after '=' for flag {=str}", key);

                        return Err(Error::MissingFlagValue(key.to_string()));
                    }
                };
            }

            #[cfg(feature = "defmt")]
            defmt::trace!("flag {=str} = {=str}", key, value);

            out.insert(key, value);
        }

        Ok(out)
    }

    fn insert(&mut self, key: &str, value: &str) {
        if let Some(flag) = self.flags.iter_mut().find(|x| x.key == key) {
            flag.push(value);
            return;
        }

        let mut flag = Flag::new(key);
        flag.push(value);
        self.flags.push(flag);
    }

    /// The positional commands, in order.
    #[inline(always)]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// The flags, in order of first appearance.
    #[inline(always)]
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// Get the flag with the given key.
    pub fn flag(&self, key: &str) -> Option<&Flag> {
        self.flags.iter().find(|x| x.key == key)
    }

    /// Check if there exists a flag with the given key.
    #[inline(always)]
    pub fn contains(&self, key: &str) -> bool {
        self.flag(key).is_some()
    }

    /// Get the last value of the flag, or `default` if the flag is absent. A flag given without
    /// value yields an empty string.
    pub fn get<'s>(&'s self, key: &str, default: &'s str) -> &'s str {
        self.flag(key).map_or(default, Flag::value)
    }

    /// Get every value of the flag, empty if the flag is absent.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.flag(key).map(Flag::values).unwrap_or_default()
    }

    /// Try to get and parse the last value of the flag if any.
    pub fn try_get_one<T>(&self, key: &str) -> Result<Option<Option<T>>, Error>
    where
        T: FromStr,
    {
        let flag = if let Some(flag) = self.flag(key) {
            flag
        } else {
            // The flag has not been found.
            return Ok(None);
        };

        if !flag.has_value() {
            // The flag has no value.
            return Ok(Some(None));
        }

        flag.value
            .parse::<T>()
            // The flag is present and has a value (i.e. Some(Some(_))).
            .map(Some)
            .map(Some)
            // The value cannot be parsed to the target type `T`.
            .map_err(|_| Error::InvalidArgument)
    }

    /// Try to get and parse every value of the flag if any. The values can be collected into any
    /// container.
    pub fn try_get_many<B, T>(&self, key: &str) -> Result<Option<B>, Error>
    where
        B: FromIterator<T>,
        T: FromStr,
    {
        if let Some(flag) = self.flag(key) {
            // Collect on Seq<Result<T, _>> can be coerced to Result<Seq<T>, _>.
            let result: Result<B, _> = flag.values.iter().map(|x| x.parse::<T>()).collect();

            // A value cannot be parsed to the target type `T`.
            return result.map(Some).map_err(|_| Error::InvalidArgument);
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use googletest::prelude::*;

    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn it_should_parse_flags_only() {
        let cmd = Commandline::parse(r#"-name="John Doe" -verbose -count=3 -count=4"#).unwrap();

        assert_that!(cmd.commands().is_empty(), eq(true));
        assert_that!(cmd.flags().len(), eq(3));

        assert_that!(cmd.get("name", ""), eq("John Doe"));

        assert_that!(cmd.contains("verbose"), eq(true));
        assert_that!(cmd.get("verbose", "unset"), eq(""));
        assert_that!(cmd.get_all("verbose").is_empty(), eq(true));

        assert_that!(cmd.get("count", ""), eq("4"));
        assert_that!(cmd.get_all("count").to_vec(), eq(&strings(&["3", "4"])));
    }

    #[test]
    fn it_should_parse_commands_then_flags() {
        let cmd = Commandline::parse("build release -target=onion").unwrap();

        assert_that!(cmd.commands().to_vec(), eq(&strings(&["build", "release"])));
        assert_that!(cmd.flags().len(), eq(1));
        assert_that!(cmd.get("target", ""), eq("onion"));
    }

    #[test]
    fn it_should_parse_commands_only() {
        let cmd = Commandline::parse("  tool:run\n  all  ").unwrap();

        assert_that!(cmd.commands().to_vec(), eq(&strings(&["tool:run", "all"])));
        assert_that!(cmd.flags().is_empty(), eq(true));
    }

    #[test]
    fn it_should_parse_empty_input() {
        let cmd = Commandline::parse("   ").unwrap();

        assert_that!(cmd, eq(&Commandline::default()));
    }

    #[test]
    fn it_should_keep_flag_order() {
        let cmd = Commandline::parse("-b=1 -a -b=2 -c='x y'").unwrap();

        let keys: Vec<&str> = cmd.flags().iter().map(Flag::key).collect();
        assert_that!(keys, eq(&vec!["b", "a", "c"]));

        let flag = cmd.flag("b").unwrap();
        assert_that!(flag.value(), eq("2"));
        assert_that!(flag.values().to_vec(), eq(&strings(&["1", "2"])));

        assert_that!(cmd.get("c", ""), eq("x y"));
    }

    #[test]
    fn it_should_not_record_empty_values() {
        let cmd = Commandline::parse(r#"-a=x -a="""#).unwrap();

        assert_that!(cmd.get("a", ""), eq("x"));
        assert_that!(cmd.get_all("a").to_vec(), eq(&strings(&["x"])));
    }

    #[test]
    fn it_should_compare_keys_with_case() {
        let cmd = Commandline::parse("-Key=1 -key=2").unwrap();

        assert_that!(cmd.flags().len(), eq(2));
        assert_that!(cmd.get("Key", ""), eq("1"));
        assert_that!(cmd.get("key", ""), eq("2"));
        assert_that!(cmd.contains("KEY"), eq(false));
    }

    #[test]
    fn it_should_stop_flags_at_a_token_without_dash() {
        let cmd = Commandline::parse("run -a=1 b=2").unwrap();

        assert_that!(cmd.flags().len(), eq(1));
        assert_that!(cmd.get("a", ""), eq("1"));
        assert_that!(cmd.contains("b"), eq(false));

        let cmd = Commandline::parse("build -target=onion extra").unwrap();

        assert_that!(cmd.commands().to_vec(), eq(&strings(&["build"])));
        assert_that!(cmd.flags().len(), eq(1));
        assert_that!(cmd.get("target", ""), eq("onion"));
        assert_that!(cmd.contains("extra"), eq(false));
    }

    #[test]
    fn it_should_ignore_a_bare_value_after_a_flag() {
        let cmd = Commandline::parse("-a 42").unwrap();

        assert_that!(cmd.flags().len(), eq(1));
        assert_that!(cmd.contains("a"), eq(true));
        assert_that!(cmd.get("a", "unset"), eq(""));
    }

    #[test]
    fn it_should_use_default_for_missing_flag() {
        let cmd = Commandline::parse("run").unwrap();

        assert_that!(cmd.get("missing", "fallback"), eq("fallback"));
        assert_that!(cmd.get_all("missing").is_empty(), eq(true));
        assert_that!(cmd.contains("missing"), eq(false));
    }

    #[test]
    fn it_should_fail_on_missing_command() {
        let res = Commandline::parse("build 42 -x");

        assert_that!(res, eq(&Err(Error::MissingCommand)));
    }

    #[test]
    fn it_should_fail_on_missing_flag_key() {
        assert_that!(
            Commandline::parse("build - =3"),
            eq(&Err(Error::MissingFlagKey))
        );
        assert_that!(
            Commandline::parse("-a -9"),
            eq(&Err(Error::MissingFlagKey))
        );
    }

    #[test]
    fn it_should_fail_on_missing_flag_value() {
        assert_that!(
            Commandline::parse("-a=1 -name="),
            eq(&Err(Error::MissingFlagValue("name".to_string())))
        );
        assert_that!(
            Commandline::parse(r#"-name="unterminated"#),
            eq(&Err(Error::MissingFlagValue("name".to_string())))
        );
    }

    #[test]
    fn it_should_parse_typed_values() {
        let cmd = Commandline::parse("-v -count=3 -count=4 -ratio=x").unwrap();

        assert_that!(cmd.try_get_one::<u32>("missing"), eq(&Ok(None)));
        assert_that!(cmd.try_get_one::<u32>("v"), eq(&Ok(Some(None))));
        assert_that!(cmd.try_get_one::<u32>("count"), eq(&Ok(Some(Some(4)))));
        assert_that!(
            cmd.try_get_one::<u32>("ratio"),
            eq(&Err(Error::InvalidArgument))
        );

        assert_that!(
            cmd.try_get_many::<Vec<u32>, u32>("count"),
            eq(&Ok(Some(vec![3, 4])))
        );
        assert_that!(
            cmd.try_get_many::<Vec<u32>, u32>("missing"),
            eq(&Ok(None))
        );
        assert_that!(
            cmd.try_get_many::<Vec<u32>, u32>("ratio"),
            eq(&Err(Error::InvalidArgument))
        );
    }
}
