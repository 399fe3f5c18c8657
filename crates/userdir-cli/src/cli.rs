use std::path::PathBuf;
use userdir::{Gender, NewUser, Pagination, UserFilter, UserRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    List,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    List(ListArgs),
    Create(CreateArgs),
    Update(UpdateArgs),
    Delete(DeleteArgs),
}

#[derive(Debug, Clone)]
pub struct ListArgs {
    pub config: PathBuf,
    pub page: Pagination,
    pub filter: UserFilter,
}

#[derive(Debug, Clone)]
pub struct CreateArgs {
    pub config: PathBuf,
    pub user: NewUser,
}

#[derive(Debug, Clone)]
pub struct UpdateArgs {
    pub config: PathBuf,
    pub record: UserRecord,
}

#[derive(Debug, Clone)]
pub struct DeleteArgs {
    pub config: PathBuf,
    pub id: i32,
}

/// Attribute flags shared by `list`, `create` and `update`.
#[derive(Debug, Clone, Default)]
struct Fields {
    name: Option<String>,
    surname: Option<String>,
    patronymic: Option<String>,
    age: Option<i32>,
    gender: Option<Gender>,
    country: Option<String>,
}

impl Fields {
    fn into_filter(self) -> UserFilter {
        let mut filter = UserFilter::new();
        if let Some(v) = self.name {
            filter = filter.with_name(v);
        }
        if let Some(v) = self.surname {
            filter = filter.with_surname(v);
        }
        if let Some(v) = self.patronymic {
            filter = filter.with_patronymic(v);
        }
        if let Some(v) = self.age {
            filter = filter.with_age(v);
        }
        if let Some(v) = self.gender {
            filter = filter.with_gender(v);
        }
        if let Some(v) = self.country {
            filter = filter.with_country(v);
        }
        filter
    }

    fn into_record(self, id: i32) -> UserRecord {
        UserRecord {
            id,
            name: self.name,
            surname: self.surname,
            patronymic: self.patronymic,
            age: self.age,
            gender: self.gender,
            country: self.country,
        }
    }
}

const DEFAULT_CONFIG: &str = "userdir.toml";

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    let rest = it.map(|s| s.as_str());
    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help(HelpTopic::Root)),
        "list" => parse_list(rest),
        "create" => parse_create(rest),
        "update" => parse_update(rest),
        "delete" => parse_delete(rest),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Value of `--flag v` or `--flag=v` when `token` is `flag`; `None` otherwise.
fn flag_value<'a>(
    token: &'a str,
    flag: &str,
    it: &mut impl Iterator<Item = &'a str>,
) -> anyhow::Result<Option<&'a str>> {
    if token == flag {
        let Some(v) = it.next() else {
            anyhow::bail!("{flag} requires a value");
        };
        return Ok(Some(v));
    }
    Ok(token
        .strip_prefix(flag)
        .and_then(|rest| rest.strip_prefix('=')))
}

fn parse_number<T: std::str::FromStr>(flag: &str, v: &str) -> anyhow::Result<T> {
    v.parse()
        .map_err(|_| anyhow::anyhow!("{flag} expects a non-negative integer, got '{v}'"))
}

/// Try `token` as a config or attribute flag. Returns `false` if it is neither.
fn parse_common<'a>(
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
    config: &mut PathBuf,
    fields: &mut Fields,
) -> anyhow::Result<bool> {
    if let Some(v) = flag_value(token, "--config", it)? {
        *config = PathBuf::from(v);
    } else if let Some(v) = flag_value(token, "--name", it)? {
        fields.name = Some(v.to_string());
    } else if let Some(v) = flag_value(token, "--surname", it)? {
        fields.surname = Some(v.to_string());
    } else if let Some(v) = flag_value(token, "--patronymic", it)? {
        fields.patronymic = Some(v.to_string());
    } else if let Some(v) = flag_value(token, "--age", it)? {
        let age: u32 = parse_number("--age", v)?;
        fields.age = Some(i32::try_from(age).map_err(|_| anyhow::anyhow!("--age out of range"))?);
    } else if let Some(v) = flag_value(token, "--gender", it)? {
        fields.gender = Some(v.parse()?);
    } else if let Some(v) = flag_value(token, "--country", it)? {
        fields.country = Some(v.to_string());
    } else {
        return Ok(false);
    }
    Ok(true)
}

fn parse_list<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut fields = Fields::default();
    let mut page = Pagination::default();

    while let Some(token) = it.next() {
        if matches!(token, "-h" | "--help") {
            return Ok(Command::Help(HelpTopic::List));
        }
        if parse_common(token, &mut it, &mut config, &mut fields)? {
            continue;
        }
        if let Some(v) = flag_value(token, "--limit", &mut it)? {
            page.limit = parse_number("--limit", v)?;
        } else if let Some(v) = flag_value(token, "--offset", &mut it)? {
            page.offset = parse_number("--offset", v)?;
        } else {
            anyhow::bail!("unknown argument: {token}");
        }
    }

    Ok(Command::List(ListArgs {
        config,
        page,
        filter: fields.into_filter(),
    }))
}

fn parse_create<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut fields = Fields::default();

    while let Some(token) = it.next() {
        if matches!(token, "-h" | "--help") {
            return Ok(Command::Help(HelpTopic::Create));
        }
        if !parse_common(token, &mut it, &mut config, &mut fields)? {
            anyhow::bail!("unknown argument: {token}");
        }
    }

    if fields.age.is_some() || fields.gender.is_some() || fields.country.is_some() {
        anyhow::bail!("create infers --age, --gender and --country; they cannot be given");
    }
    let Some(name) = fields.name else {
        anyhow::bail!("create requires --name");
    };
    let Some(surname) = fields.surname else {
        anyhow::bail!("create requires --surname");
    };

    Ok(Command::Create(CreateArgs {
        config,
        user: NewUser {
            name,
            surname,
            patronymic: fields.patronymic,
        },
    }))
}

fn parse_update<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut fields = Fields::default();
    let mut id: Option<i32> = None;

    while let Some(token) = it.next() {
        if matches!(token, "-h" | "--help") {
            return Ok(Command::Help(HelpTopic::Update));
        }
        if parse_common(token, &mut it, &mut config, &mut fields)? {
            continue;
        }
        if let Some(v) = flag_value(token, "--id", &mut it)? {
            id = Some(parse_number("--id", v)?);
        } else {
            anyhow::bail!("unknown argument: {token}");
        }
    }

    let Some(id) = id else {
        anyhow::bail!("update requires --id");
    };
    Ok(Command::Update(UpdateArgs {
        config,
        record: fields.into_record(id),
    }))
}

fn parse_delete<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut id: Option<i32> = None;

    while let Some(token) = it.next() {
        if matches!(token, "-h" | "--help") {
            return Ok(Command::Help(HelpTopic::Delete));
        }
        if let Some(v) = flag_value(token, "--config", &mut it)? {
            config = PathBuf::from(v);
        } else if let Some(v) = flag_value(token, "--id", &mut it)? {
            id = Some(parse_number("--id", v)?);
        } else {
            anyhow::bail!("unknown argument: {token}");
        }
    }

    let Some(id) = id else {
        anyhow::bail!("delete requires --id");
    };
    Ok(Command::Delete(DeleteArgs { config, id }))
}

pub fn print_help(topic: HelpTopic) {
    let text = match topic {
        HelpTopic::Root => {
            "userdir - user directory with name-based enrichment\n\n\
             USAGE:\n  userdir <command> [options]\n\n\
             COMMANDS:\n  list     List users matching a filter\n  \
             create   Create a user, inferring country, age and gender\n  \
             update   Update attributes of a user\n  \
             delete   Delete a user\n\n\
             Every command accepts --config <path> (default: userdir.toml).\n\
             Set RUST_LOG (e.g. RUST_LOG=userdir=debug) for logs.\n"
        }
        HelpTopic::List => {
            "userdir list [--limit N] [--offset N] [--name S] [--surname S] [--patronymic S]\n\
             \x20            [--age N] [--gender male|female] [--country S] [--config PATH]\n"
        }
        HelpTopic::Create => {
            "userdir create --name S --surname S [--patronymic S] [--config PATH]\n"
        }
        HelpTopic::Update => {
            "userdir update --id N [--name S] [--surname S] [--patronymic S] [--age N]\n\
             \x20              [--gender male|female] [--country S] [--config PATH]\n"
        }
        HelpTopic::Delete => "userdir delete --id N [--config PATH]\n",
    };
    print!("{text}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("userdir")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn no_arguments_prints_root_help() {
        assert!(matches!(
            parse_args(&args(&[])).unwrap(),
            Command::Help(HelpTopic::Root)
        ));
    }

    #[test]
    fn list_parses_pagination_and_filter() {
        let cmd = parse_args(&args(&[
            "list", "--limit", "5", "--offset=10", "--age", "0", "--gender", "female",
        ]))
        .unwrap();
        let Command::List(list) = cmd else {
            panic!("expected list");
        };
        assert_eq!(list.page, Pagination::new(5, 10));
        assert_eq!(list.filter, UserFilter::new().with_age(0).with_gender(Gender::Female));
        assert_eq!(list.config, PathBuf::from("userdir.toml"));
    }

    #[test]
    fn create_requires_name_and_surname() {
        assert!(parse_args(&args(&["create", "--name", "Ana"])).is_err());
        let cmd = parse_args(&args(&[
            "create", "--name", "Ana", "--surname", "Lee", "--config", "/etc/u.toml",
        ]))
        .unwrap();
        let Command::Create(create) = cmd else {
            panic!("expected create");
        };
        assert_eq!(create.user, NewUser::new("Ana", "Lee"));
        assert_eq!(create.config, PathBuf::from("/etc/u.toml"));
    }

    #[test]
    fn create_rejects_inferred_fields() {
        let cmd = ["create", "--name", "A", "--surname", "B", "--age", "3"];
        assert!(parse_args(&args(&cmd)).is_err());
    }

    #[test]
    fn update_builds_partial_record() {
        let cmd = parse_args(&args(&["update", "--id", "7", "--country", "FR"])).unwrap();
        let Command::Update(update) = cmd else {
            panic!("expected update");
        };
        let mut expected = UserRecord::for_id(7);
        expected.country = Some("FR".into());
        assert_eq!(update.record, expected);
    }

    #[test]
    fn rejects_bad_numbers_and_unknown_flags() {
        assert!(parse_args(&args(&["list", "--limit", "-1"])).is_err());
        assert!(parse_args(&args(&["delete"])).is_err());
        assert!(parse_args(&args(&["delete", "--id", "x"])).is_err());
        assert!(parse_args(&args(&["list", "--bogus"])).is_err());
        assert!(parse_args(&args(&["frobnicate"])).is_err());
    }
}
