//! Test-server run planning.
//!
//! [`plan`] turns an [`MqtConfig`] into the command lines of a test run
//! without executing anything:
//!
//! 1. a setup command installing the test dependencies into the template
//!    database,
//! 2. one [`TestRun`] for all modules, or one per module in unit-test mode.
//!
//! The results of the executed commands are folded back with [`summarize`].

use std::fmt;
use std::process::Command;

use mqt_addons::{AddonsWalker, get_addons, get_test_dependencies};
use mqt_fs::NormalizedPath;
use mqt_manifest::OdooVersion;
use mqt_testlog::has_test_errors;

use crate::config::MqtConfig;
use crate::{Error, Result};

/// Log handler raising the yaml test importer to debug level.
pub const YAML_LOG_HANDLER: &str = "openerp.tools.yaml_import:DEBUG";

/// Directory of the server checkout: `<home>/<repo>-<version>`.
pub fn server_path(
    home: &NormalizedPath,
    odoo_repo: &str,
    version: &str,
) -> Result<NormalizedPath> {
    let repo = match odoo_repo.split_once('/') {
        Some((org, repo)) if !org.is_empty() && !repo.is_empty() && !repo.contains('/') => repo,
        _ => {
            return Err(Error::InvalidOdooRepo {
                repo: odoo_repo.to_string(),
            });
        }
    };
    Ok(home.join(&format!("{repo}-{version}")))
}

/// Server executable name for `version`.
pub fn server_script(version: &OdooVersion) -> &'static str {
    if version.major() >= 10 {
        "odoo-bin"
    } else {
        "openerp-server"
    }
}

/// Addons roots of the build dir, then of the dependencies dir, then the
/// server's own `addons` directory.
pub fn addons_path(
    build_dir: &NormalizedPath,
    dependencies_dir: &NormalizedPath,
    server_path: &NormalizedPath,
) -> Vec<NormalizedPath> {
    let mut paths = get_addons(build_dir);
    paths.extend(get_addons(dependencies_dir));
    paths.push(server_path.join("addons"));
    paths
}

/// Modules to test: `include` when given, otherwise every installable module
/// found below `build_dir`; `exclude` is removed either way.
pub fn addons_to_check(
    build_dir: &NormalizedPath,
    include: &[String],
    exclude: &[String],
) -> Vec<String> {
    let modules = if include.is_empty() {
        AddonsWalker::new().recursive(true).modules(build_dir)
    } else {
        include.to_vec()
    };
    modules
        .into_iter()
        .filter(|m| !exclude.contains(m))
        .collect()
}

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub args: Vec<String>,
}

impl CommandLine {
    fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// A [`Command`] ready to spawn, or `None` for an empty line.
    pub fn to_command(&self) -> Option<Command> {
        let (program, args) = self.args.split_first()?;
        let mut command = Command::new(program);
        command.args(args);
        Some(command)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.args.join(" "))
    }
}

/// One command of a test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStep {
    pub command: CommandLine,
    /// Whether its log must contain the modules-loaded message.
    pub check_loaded: bool,
}

/// The commands testing one target (a module, or all modules joined with
/// commas).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRun {
    pub target: String,
    pub steps: Vec<RunStep>,
}

/// Everything needed to run the tests of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPlan {
    pub version: OdooVersion,
    pub server_path: NormalizedPath,
    pub script: &'static str,
    pub addons_path: Vec<NormalizedPath>,
    /// Modules under test.
    pub modules: Vec<String>,
    /// Modules installed in the template database beforehand.
    pub preinstall: Vec<String>,
    /// Creates the template database content.
    pub setup: CommandLine,
    pub runs: Vec<TestRun>,
    pub expected_errors: usize,
}

impl TestPlan {
    /// Whether there is nothing to test.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Addons path in server syntax.
    pub fn addons_path_arg(&self) -> String {
        self.addons_path
            .iter()
            .map(NormalizedPath::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Build the test plan for `config`.
pub fn plan(config: &MqtConfig) -> Result<TestPlan> {
    let version = config.odoo_version()?;
    let build_dir = config.build_dir();
    let server_path = server_path(&config.home_dir(), &config.odoo_repo, &config.version)?;
    let script = server_script(&version);
    let addons_path = addons_path(&build_dir, &config.dependencies_dir(), &server_path);
    let modules = addons_to_check(&build_dir, &config.include, &config.exclude);

    let own_modules = AddonsWalker::new().recursive(true).modules(&build_dir);
    let preinstall: Vec<String> = get_test_dependencies(&addons_path, &modules)?
        .into_iter()
        .filter(|m| !own_modules.contains(m))
        .collect();

    tracing::info!(
        version = %version,
        server = %server_path,
        modules = ?modules,
        preinstall = ?preinstall,
        "Planned test run"
    );

    let builder = CommandBuilder::new(config, &version, &server_path, script);
    let setup = builder.setup(&preinstall);
    let runs = if config.unit_test {
        modules
            .iter()
            .map(|module| TestRun {
                target: module.clone(),
                steps: vec![
                    RunStep {
                        command: builder.install(module),
                        check_loaded: false,
                    },
                    RunStep {
                        command: builder.test(module),
                        check_loaded: true,
                    },
                ],
            })
            .collect()
    } else if modules.is_empty() {
        Vec::new()
    } else {
        let target = modules.join(",");
        vec![TestRun {
            steps: vec![RunStep {
                command: builder.test(&target),
                check_loaded: true,
            }],
            target,
        }]
    };

    Ok(TestPlan {
        version,
        server_path,
        script,
        addons_path,
        modules,
        preinstall,
        setup,
        runs,
        expected_errors: config.expected_errors,
    })
}

/// Shared pieces of the server command lines.
struct CommandBuilder<'a> {
    config: &'a MqtConfig,
    executable: String,
    log_level: &'static str,
    log_handler: Option<&'static str>,
    install_options: Vec<String>,
    test_options: Vec<String>,
}

impl<'a> CommandBuilder<'a> {
    fn new(
        config: &'a MqtConfig,
        version: &OdooVersion,
        server_path: &NormalizedPath,
        script: &str,
    ) -> Self {
        let mut install_options = config.install_options.clone();
        let mut test_options = config.options.clone();
        let (log_level, log_handler) = match (version.major(), version.minor()) {
            (6, 1) => {
                install_options.push("--test-disable".to_string());
                ("test", None)
            }
            (7, 0) => ("test", None),
            _ => ("info", Some(YAML_LOG_HANDLER)),
        };
        if config.test_enable && !(version.major() == 6 && version.minor() == 1) {
            test_options.push("--test-enable".to_string());
        }

        Self {
            config,
            executable: server_path.join(script).as_str().to_string(),
            log_level,
            log_handler,
            install_options,
            test_options,
        }
    }

    /// Server executable, database and data directory.
    fn server(&self, database: &str) -> [String; 4] {
        [
            self.executable.clone(),
            "-d".to_string(),
            database.to_string(),
            format!("--data-dir={}", self.config.data_dir),
        ]
    }

    fn prefix(&self) -> Vec<String> {
        if self.config.unbuffer {
            vec!["unbuffer".to_string()]
        } else {
            Vec::new()
        }
    }

    fn setup(&self, preinstall: &[String]) -> CommandLine {
        let mut args = self.prefix();
        args.extend(self.server(&self.config.template_db));
        args.extend([
            "--log-level=info".to_string(),
            "--stop-after-init".to_string(),
            "--init".to_string(),
            preinstall.join(","),
        ]);
        args.extend(self.install_options.iter().cloned());
        args.extend(self.config.server_options.iter().cloned());
        CommandLine::new(args)
    }

    fn install(&self, target: &str) -> CommandLine {
        let mut args = self.prefix();
        args.extend(self.server(&self.config.test_db));
        args.extend([
            "--stop-after-init".to_string(),
            "--log-level=warn".to_string(),
        ]);
        args.extend(self.install_options.iter().cloned());
        args.extend(["--init".to_string(), target.to_string()]);
        args.extend(self.config.server_options.iter().cloned());
        CommandLine::new(args)
    }

    fn test(&self, target: &str) -> CommandLine {
        let mut args = self.prefix();
        if self.config.coverage {
            args.extend(["coverage".to_string(), "run".to_string()]);
        }
        args.extend(self.server(&self.config.test_db));
        args.extend([
            "--stop-after-init".to_string(),
            "--log-level".to_string(),
            self.log_level.to_string(),
        ]);
        if let Some(handler) = self.log_handler {
            args.extend(["--log-handler".to_string(), handler.to_string()]);
        }
        args.extend(self.test_options.iter().cloned());
        args.extend(["--init".to_string(), target.to_string()]);
        CommandLine::new(args)
    }
}

/// Outcome of one executed [`RunStep`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub target: String,
    /// Exit code; `None` when killed by a signal.
    pub returncode: Option<i32>,
    /// Errors found in the step's log.
    pub errors: usize,
}

impl RunResult {
    /// Classify the log written by a step.
    pub fn from_log(
        target: impl Into<String>,
        returncode: Option<i32>,
        log: &NormalizedPath,
        database: &str,
        version: &OdooVersion,
        check_loaded: bool,
    ) -> Result<Self> {
        let errors = has_test_errors(log, database, version, check_loaded)?;
        Ok(Self {
            target: target.into(),
            returncode,
            errors,
        })
    }

    pub fn succeeded(&self) -> bool {
        self.returncode == Some(0)
    }

    /// Errors counted for this step; a failed command counts at least one.
    pub fn counted_errors(&self) -> usize {
        if self.succeeded() {
            self.errors
        } else {
            self.errors.max(1)
        }
    }
}

/// Verdict over all executed steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Targets in execution order with whether they passed.
    pub targets: Vec<(String, bool)>,
    pub counted_errors: usize,
    pub expected_errors: usize,
}

impl Summary {
    pub fn failed_targets(&self) -> impl Iterator<Item = &str> {
        self.targets
            .iter()
            .filter(|(_, passed)| !passed)
            .map(|(target, _)| target.as_str())
    }

    /// 0 when exactly the expected number of errors was found, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.counted_errors == self.expected_errors {
            0
        } else {
            1
        }
    }
}

/// Fold step results into a [`Summary`].
pub fn summarize(results: &[RunResult], expected_errors: usize) -> Summary {
    let mut targets: Vec<(String, bool)> = Vec::new();
    let mut counted_errors = 0;

    for result in results {
        let errors = result.counted_errors();
        counted_errors += errors;
        let passed = errors == 0;

        match targets.iter_mut().find(|(t, _)| *t == result.target) {
            Some((_, ok)) => *ok &= passed,
            None => targets.push((result.target.clone(), passed)),
        }
    }

    if counted_errors != expected_errors {
        tracing::warn!(
            expected = expected_errors,
            found = counted_errors,
            "Unexpected error count"
        );
    }

    Summary {
        targets,
        counted_errors,
        expected_errors,
    }
}
