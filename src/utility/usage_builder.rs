
use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, Permissions};


enum ParameterType {
    Required,
    Optional,
}

struct Parameter {
    name: &'static str,
    description: &'static str,
    param_type: ParameterType,
    choices: Vec<String>,
}

/// Describes a slash command once, for registration and for usage hints.
pub struct UsageBuilder {
    pub name: &'static str,
    description: &'static str,
    permissions: Option<Permissions>,
    parameters: Vec<Parameter>,
}

impl UsageBuilder {

    pub fn new(name: &'static str, description: &'static str) -> UsageBuilder {
        UsageBuilder {
            name,
            description,
            permissions: None,
            parameters: Vec::new(),
        }
    }

    pub fn default_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn add_required(mut self, name: &'static str, description: &'static str, choices: Vec<String>) -> Self {
        self.parameters.push(Parameter {
            name,
            description,
            param_type: ParameterType::Required,
            choices,
        });
        self
    }

    pub fn add_optional(mut self, name: &'static str, description: &'static str) -> Self {
        self.parameters.push(Parameter {
            name,
            description,
            param_type: ParameterType::Optional,
            choices: Vec::new(),
        });
        self
    }

    /// Human readable syntax, e.g. `/auto_ping <action: start|stop> [cron]`.
    pub fn syntax(&self) -> String {
        let mut usage_string = format!("/{}", self.name);
        for parameter in self.parameters.iter() {
            let name = match parameter.choices.is_empty() {
                true  => parameter.name.to_string(),
                false => format!("{}: {}", parameter.name, parameter.choices.join("|")),
            };
            match parameter.param_type {
                ParameterType::Required => usage_string.push_str(&format!(" <{}>", name)),
                ParameterType::Optional => usage_string.push_str(&format!(" [{}]", name)),
            }
        }
        usage_string
    }

    pub fn build(&self) -> CreateCommand {
        let mut command = CreateCommand::new(self.name)
            .description(self.description);
        if let Some(permissions) = self.permissions {
            command = command.default_member_permissions(permissions);
        }
        for parameter in self.parameters.iter() {
            let required = matches!(parameter.param_type, ParameterType::Required);
            let mut option = CreateCommandOption::new(
                CommandOptionType::String,
                parameter.name,
                parameter.description)
                .required(required);
            for choice in parameter.choices.iter() {
                option = option.add_string_choice(choice, choice);
            }
            command = command.add_option(option);
        }
        command
    }

}
