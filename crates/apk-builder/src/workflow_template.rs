//! Android build workflow template
//!
//! The workflow YAML is rendered with minijinja using `[[[ ]]]` variable
//! delimiters, so GitHub's own `${{ }}` expressions pass through untouched.
//! Every user-supplied value is emitted as a JSON string, which YAML reads
//! as a double-quoted scalar.

use anyhow::{Context, Result};
use apk_builder_config::SecretsMode;
use minijinja::syntax::SyntaxConfig;
use minijinja::{context, AutoEscape, Environment, UndefinedBehavior};
use tg_notifier::NotifierCredentials;

const TEMPLATE_NAME: &str = "android-build.yml";
const TEMPLATE: &str = include_str!("../templates/android-build.yml");

/// Repository secret holding the bot token
pub const TOKEN_SECRET: &str = "TELEGRAM_BOT_TOKEN";
/// Repository secret holding the chat id
pub const CHAT_ID_SECRET: &str = "TELEGRAM_CHAT_ID";

/// Gradle task for a build variant
pub fn build_command(variant: &str) -> &'static str {
    match variant {
        "release" => "assembleRelease",
        "debug" => "assembleDebug",
        _ => "assemble",
    }
}

/// Values filled into the workflow template
#[derive(Debug, Clone)]
pub struct WorkflowParams<'a> {
    pub variant: &'a str,
    pub branch: &'a str,
    pub notifier: &'a NotifierCredentials,
    pub secrets: SecretsMode,
}

/// Render the workflow file content
pub fn render(params: &WorkflowParams<'_>) -> Result<String> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    let syntax = SyntaxConfig::builder()
        .block_delimiters("[%", "%]")
        .variable_delimiters("[[[", "]]]")
        .comment_delimiters("[#", "#]")
        .build()
        .context("Failed to configure workflow template syntax")?;
    env.set_syntax(syntax);

    env.add_template(TEMPLATE_NAME, TEMPLATE)
        .context("Failed to load workflow template")?;

    let (telegram_to, telegram_token) = match params.secrets {
        SecretsMode::Inline => {
            log::warn!(
                "Embedding Telegram credentials in the workflow file; set notifier_secrets = \"repository_secrets\" to use {} and {} instead",
                TOKEN_SECRET,
                CHAT_ID_SECRET
            );
            (
                quoted(&params.notifier.chat_id)?,
                quoted(&params.notifier.token)?,
            )
        }
        SecretsMode::RepositorySecrets => (
            format!("${{{{ secrets.{} }}}}", CHAT_ID_SECRET),
            format!("${{{{ secrets.{} }}}}", TOKEN_SECRET),
        ),
    };

    let rendered = env
        .get_template(TEMPLATE_NAME)
        .context("Failed to access workflow template")?
        .render(context! {
            build_type => quoted(params.variant)?,
            branch => quoted(params.branch)?,
            build_command => build_command(params.variant),
            telegram_to => telegram_to,
            telegram_token => telegram_token,
        })
        .context("Failed to render workflow template")?;

    Ok(rendered)
}

fn quoted(value: &str) -> Result<String> {
    serde_json::to_string(value).context("Failed to quote template value")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn notifier() -> NotifierCredentials {
        NotifierCredentials::new("123456:bot-secret", "-100200")
    }

    fn render_for(variant: &str, secrets: SecretsMode) -> String {
        let notifier = notifier();
        render(&WorkflowParams {
            variant,
            branch: "main",
            notifier: &notifier,
            secrets,
        })
        .unwrap()
    }

    fn telegram_step(yaml: &serde_yaml::Value) -> serde_yaml::Value {
        yaml["jobs"]["build"]["steps"]
            .as_sequence()
            .unwrap()
            .iter()
            .find(|step| step["uses"].as_str() == Some("appleboy/telegram-action@master"))
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_build_command_per_variant() {
        assert_eq!(build_command("release"), "assembleRelease");
        assert_eq!(build_command("debug"), "assembleDebug");
        assert_eq!(build_command("staging"), "assemble");
    }

    #[test]
    fn test_rendered_workflow_embeds_build_command() {
        assert!(render_for("release", SecretsMode::Inline).contains("./gradlew assembleRelease\n"));
        assert!(render_for("debug", SecretsMode::Inline).contains("./gradlew assembleDebug\n"));
        assert!(render_for("staging", SecretsMode::Inline).contains("./gradlew assemble\n"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        assert_eq!(
            render_for("release", SecretsMode::RepositorySecrets),
            render_for("release", SecretsMode::RepositorySecrets)
        );
    }

    #[test]
    fn test_rendered_workflow_is_valid_yaml() {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(&render_for("release", SecretsMode::Inline)).unwrap();
        assert_eq!(yaml["jobs"]["build"]["runs-on"].as_str(), Some("ubuntu-latest"));
        assert_eq!(yaml["env"]["BUILD_TYPE"].as_str(), Some("release"));

        let step = telegram_step(&yaml);
        assert_eq!(step["with"]["token"].as_str(), Some("123456:bot-secret"));
        assert_eq!(step["with"]["to"].as_str(), Some("-100200"));
    }

    #[test]
    fn test_github_expressions_survive_rendering() {
        let rendered = render_for("debug", SecretsMode::Inline);
        assert!(rendered.contains("${{ steps.find_apk.outputs.APK_PATH }}"));
        assert!(rendered.contains("${{ github.repository }}"));
    }

    #[test]
    fn test_repository_secrets_mode_keeps_credentials_out_of_the_file() {
        let rendered = render_for("debug", SecretsMode::RepositorySecrets);
        assert!(!rendered.contains("bot-secret"));
        assert!(!rendered.contains("-100200"));

        let yaml: serde_yaml::Value = serde_yaml::from_str(&rendered).unwrap();
        let step = telegram_step(&yaml);
        assert_eq!(
            step["with"]["token"].as_str(),
            Some("${{ secrets.TELEGRAM_BOT_TOKEN }}")
        );
        assert_eq!(
            step["with"]["to"].as_str(),
            Some("${{ secrets.TELEGRAM_CHAT_ID }}")
        );
    }

    #[test]
    fn test_hostile_values_cannot_break_out_of_their_scalar() {
        let notifier = NotifierCredentials {
            token: "1:x\"\n  evil: true".to_string(),
            chat_id: "42".to_string(),
        };
        let rendered = render(&WorkflowParams {
            variant: "debug",
            branch: "main",
            notifier: &notifier,
            secrets: SecretsMode::Inline,
        })
        .unwrap();

        let yaml: serde_yaml::Value = serde_yaml::from_str(&rendered).unwrap();
        let step = telegram_step(&yaml);
        assert_eq!(step["with"]["token"].as_str(), Some("1:x\"\n  evil: true"));
        assert!(step["with"]["evil"].is_null());
    }
}
