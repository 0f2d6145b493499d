use serde::Serialize;

/// One selectable (value, label) pair of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text {
        min_length: Option<usize>,
        max_length: Option<usize>,
    },
    Decimal,
    Choice {
        choices: Vec<Choice>,
    },
}

/// Describes a form field for the host's form-rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub label: String,
    pub help_text: Option<String>,
    pub required: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FormField {
    pub fn text(label: impl Into<String>, min_length: Option<usize>, max_length: Option<usize>) -> Self {
        Self::with_kind(
            label,
            FieldKind::Text {
                min_length,
                max_length,
            },
        )
    }

    pub fn decimal(label: impl Into<String>) -> Self {
        Self::with_kind(label, FieldKind::Decimal)
    }

    pub fn choice(label: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self::with_kind(label, FieldKind::Choice { choices })
    }

    fn with_kind(label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            label: label.into(),
            help_text: None,
            required: true,
            kind,
        }
    }

    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Choices in presentation order; empty for non-choice fields.
    pub fn choices(&self) -> &[Choice] {
        match &self.kind {
            FieldKind::Choice { choices } => choices.as_slice(),
            _ => &[],
        }
    }
}

/// Named form fields, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormFields(Vec<(String, FormField)>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing any existing one with the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, field: FormField) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = field,
            None => self.0.push((name, field)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, field)| field)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::ops::Index<&str> for FormFields {
    type Output = FormField;

    fn index(&self, name: &str) -> &FormField {
        self.get(name)
            .unwrap_or_else(|| panic!("no form field named '{name}'"))
    }
}
