use cfkit_core::{action, print_success};
use std::path::PathBuf;

use super::{GlobalArgs, SubcmdResult};

/// Write an example cfkit.toml into the directory
#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg(default_value = "./")]
    pub dir: PathBuf,
}

pub fn exec(args: &Args, _: &GlobalArgs) -> SubcmdResult {
    let path = action::init_workspace(&args.dir)?;
    print_success!(
        "Successfully initialized cfkit workspace. (config: {})",
        path.to_string_lossy()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use clap::Parser as _;

    use super::*;

    #[test]
    fn init_twice_fails() {
        let dir = tempfile::tempdir().unwrap();
        let global = GlobalArgs::parse_from(["cf", "init"]);
        let args = Args {
            dir: dir.path().to_owned(),
        };

        exec(&args, &global).unwrap();
        assert!(dir.path().join("cfkit.toml").is_file());
        assert!(exec(&args, &global).is_err());
    }
}
