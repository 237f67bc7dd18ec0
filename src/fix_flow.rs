use crate::{
    config::Config,
    confirm_ui::{ConfirmUI, FixDecision},
    executor::{Executor, ShellRunner, SystemShellRunner},
    history::HistoryReader,
    llm_corrector::{Corrector, LlmCorrector, MockCorrector},
};
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::info;

/// Runtime switches taken from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowOptions {
    pub verbose: bool,
    pub dry_run: bool,
}

/// Drives one full fixing pass: read history, ask for a correction, confirm,
/// execute.
///
/// The flow never calls `process::exit`. It reports the outcome as an exit
/// code so `main` owns the single exit point, and it returns an error only
/// for fatal setup problems such as a missing API key.
pub struct FixFlow {
    history: HistoryReader,
    confirm_ui: ConfirmUI,
    executor: Executor,
    options: FlowOptions,
}

impl FixFlow {
    pub fn new(options: FlowOptions) -> Self {
        Self::with_history(HistoryReader::new(), options)
    }

    /// Flow over a specific history source (for testing).
    pub fn with_history(history: HistoryReader, options: FlowOptions) -> Self {
        Self {
            history,
            confirm_ui: ConfirmUI::new(),
            executor: Executor::new(),
            options,
        }
    }

    /// Runs the flow against the real shell and standard streams.
    pub async fn run(&self, config: &Config) -> Result<i32> {
        self.run_with_io(
            config,
            &SystemShellRunner,
            &mut std::io::stdin().lock(),
            &mut std::io::stdout(),
            &mut std::io::stderr(),
        )
        .await
    }

    /// Runs the flow with injected dependencies (for testing).
    pub async fn run_with_io<R, W1, W2>(
        &self,
        config: &Config,
        runner: &impl ShellRunner,
        input: &mut R,
        output: &mut W1,
        errout: &mut W2,
    ) -> Result<i32>
    where
        R: BufRead,
        W1: Write,
        W2: Write,
    {
        self.vprint(output, "Starting the command fixing process...")?;

        let Some(last_command) = self.history.last_command() else {
            self.vprint(output, "No previous command found in bash history.")?;
            return Ok(0);
        };

        writeln!(output, "Last command found: {}", last_command)?;

        // Building the corrector is the credential check. It happens after
        // the empty-history return so a missing key never blocks a no-op
        // run, and before any network traffic.
        let corrector = Self::build_corrector(config)?;

        self.vprint(output, "Asking the model to fix the command...")?;

        let Some(fixed_command) = corrector.fix_command(&last_command).await else {
            self.vprint(output, "The model did not suggest any fix for the command.")?;
            return Ok(0);
        };

        self.vprint(output, "The model suggested a fix.")?;
        self.vprint(output, &format!("Original command: {}", last_command))?;

        if self.options.dry_run {
            writeln!(output, "{}", fixed_command)?;
            return Ok(0);
        }

        match self
            .confirm_ui
            .prompt_for_execution_with_io(&fixed_command, input, output)?
        {
            FixDecision::Execute => {
                self.executor
                    .run_command_with_io(&fixed_command, runner, input, output, errout)
            }
            FixDecision::Cancelled => {
                self.vprint(output, "Operation cancelled by user.")?;
                Ok(0)
            }
        }
    }

    fn build_corrector(config: &Config) -> Result<Box<dyn Corrector>> {
        if config.is_mock_mode() {
            info!("Using mock corrector (FLEM_USE_MOCK=1)");
            Ok(Box::new(MockCorrector::new()))
        } else {
            Ok(Box::new(LlmCorrector::from_config(config)?))
        }
    }

    fn vprint<W: Write>(&self, output: &mut W, message: &str) -> Result<()> {
        if self.options.verbose {
            writeln!(output, "{}", message)?;
        }
        Ok(())
    }
}
