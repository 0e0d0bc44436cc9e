//! Calibration examples embedded in the system prompt
//!
//! The values below are shown to the oracle as worked examples, so they must
//! be accurate translations. Every example provides English, French, Italian,
//! Spanish, German and Portuguese phrases. To support another language, add a
//! phrase for it to *every* example. Ambiguous examples are selected by their
//! (original, context) couple; add a new ambiguous example to support another
//! couple.

use std::collections::HashMap;

use crate::error::ConfigError;

/// The three languages of a translation run
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTriple {
    pub original: String,
    pub context: String,
    pub target: String,
}

impl LanguageTriple {
    pub fn new(
        original: impl Into<String>,
        context: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            original: original.into(),
            context: context.into(),
            target: target.into(),
        }
    }

    fn all(&self) -> [&str; 3] {
        [&self.original, &self.context, &self.target]
    }
}

/// Placeholder syntaxes found in gettext catalogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderSyntax {
    /// `%(name)s`
    NamedPercent,
    /// `{name}`
    Brace,
    /// `%s` / `%d`
    Positional,
}

/// What an example demonstrates, with the fields only that kind needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExampleKind {
    /// Bare input/output shape
    Basic,
    /// A phrase only the context translation disambiguates
    Ambiguous {
        original_language: String,
        context_language: String,
        /// Rendered with `{target_language}` and `{target_translation}` bound
        explanation: String,
    },
    /// Placeholders that must be kept verbatim
    Placeholder(PlaceholderSyntax),
    /// Inline markup that must be kept verbatim
    Markup,
    /// Extra worked examples for back-ends that need a large system prompt
    Supplementary,
}

impl ExampleKind {
    pub fn label(&self) -> &'static str {
        match self {
            ExampleKind::Basic => "basic",
            ExampleKind::Ambiguous { .. } => "ambiguous",
            ExampleKind::Placeholder(PlaceholderSyntax::NamedPercent) => "%(name)s placeholder",
            ExampleKind::Placeholder(PlaceholderSyntax::Brace) => "{name} placeholder",
            ExampleKind::Placeholder(PlaceholderSyntax::Positional) => "%s placeholder",
            ExampleKind::Markup => "markup",
            ExampleKind::Supplementary => "supplementary",
        }
    }
}

/// One phrase in several languages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub kind: ExampleKind,
    phrases: HashMap<String, String>,
}

impl Example {
    pub fn new(kind: ExampleKind, phrases: &[(&str, &str)]) -> Self {
        Self {
            kind,
            phrases: phrases
                .iter()
                .map(|(lang, phrase)| (lang.to_string(), phrase.to_string()))
                .collect(),
        }
    }

    pub fn phrase(&self, language: &str) -> Result<&str, ConfigError> {
        self.phrases
            .get(language)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingExamplePhrase {
                example: self.kind.label().to_string(),
                language: language.to_string(),
            })
    }

    /// Phrases for (original, context, target)
    pub fn triple(&self, languages: &LanguageTriple) -> Result<(&str, &str, &str), ConfigError> {
        Ok((
            self.phrase(&languages.original)?,
            self.phrase(&languages.context)?,
            self.phrase(&languages.target)?,
        ))
    }

    fn check(&self, languages: &LanguageTriple) -> Result<(), ConfigError> {
        for language in languages.all() {
            self.phrase(language)?;
        }
        Ok(())
    }
}

/// The examples selected for one language triple
#[derive(Debug, Clone)]
pub struct SelectedExamples<'a> {
    pub basic: &'a Example,
    pub ambiguous: &'a Example,
    pub placeholders: [&'a Example; 3],
    pub markup: [&'a Example; 2],
    pub supplementary: Vec<&'a Example>,
}

/// Static table of calibration examples
#[derive(Debug, Clone)]
pub struct CalibrationSet {
    examples: Vec<Example>,
}

impl CalibrationSet {
    pub fn new(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    fn first_of(
        &self,
        kind: &str,
        pred: impl Fn(&ExampleKind) -> bool,
    ) -> Result<&Example, ConfigError> {
        self.examples
            .iter()
            .find(|e| pred(&e.kind))
            .ok_or_else(|| ConfigError::ExampleCount {
                kind: kind.to_string(),
                expected: 1,
                found: 0,
            })
    }

    /// The ambiguous example whose (original, context) couple matches exactly
    pub fn ambiguous_for(&self, original: &str, context: &str) -> Result<&Example, ConfigError> {
        self.examples
            .iter()
            .find(|e| {
                matches!(
                    &e.kind,
                    ExampleKind::Ambiguous { original_language, context_language, .. }
                        if original_language == original && context_language == context
                )
            })
            .ok_or_else(|| ConfigError::MissingAmbiguousExample {
                original: original.to_string(),
                context: context.to_string(),
            })
    }

    /// Pick the examples for `languages` and check that each one has a phrase
    /// for all three languages.
    pub fn select(&self, languages: &LanguageTriple) -> Result<SelectedExamples<'_>, ConfigError> {
        let basic = self.first_of("basic", |k| matches!(k, ExampleKind::Basic))?;
        let ambiguous = self.ambiguous_for(&languages.original, &languages.context)?;
        let placeholders = [
            PlaceholderSyntax::NamedPercent,
            PlaceholderSyntax::Brace,
            PlaceholderSyntax::Positional,
        ]
        .map(|syntax| {
            self.first_of(ExampleKind::Placeholder(syntax).label(), move |k| {
                *k == ExampleKind::Placeholder(syntax)
            })
        });
        let [p1, p2, p3] = placeholders;
        let placeholders = [p1?, p2?, p3?];

        let markup: Vec<&Example> = self
            .examples
            .iter()
            .filter(|e| e.kind == ExampleKind::Markup)
            .collect();
        let markup: [&Example; 2] = match markup.as_slice() {
            [first, second, ..] => [*first, *second],
            _ => {
                return Err(ConfigError::ExampleCount {
                    kind: "markup".to_string(),
                    expected: 2,
                    found: markup.len(),
                });
            }
        };

        let supplementary: Vec<&Example> = self
            .examples
            .iter()
            .filter(|e| e.kind == ExampleKind::Supplementary)
            .collect();

        let selected = SelectedExamples {
            basic,
            ambiguous,
            placeholders,
            markup,
            supplementary,
        };
        for example in [basic, ambiguous]
            .into_iter()
            .chain(placeholders)
            .chain(markup)
            .chain(selected.supplementary.iter().copied())
        {
            example.check(languages)?;
        }
        Ok(selected)
    }
}

impl Default for CalibrationSet {
    fn default() -> Self {
        builtin_examples()
    }
}

const EXPLANATION_EN_FR: &str = "
Explanation: This {target_language} translation reflects the meaning of the French phrase, which indicates that the person
made a phone call, not that he gave a ring. The English phrase \"He gave her a ring\" can be ambiguous, as it can mean both
\"giving a ring\" and \"making a phone call\" colloquially. The French translation makes it clear that it is a phone call, so
the {target_language} version \"{target_translation}\" follows this interpretation.";

const EXPLANATION_FR_EN: &str = "
Dans ce contexte, \"s'effondrer\" fait référence à une rupture émotionnelle plutôt qu'à une défaillance
mécanique, comme le confirme la traduction anglaise \"broke down\". La traduction {target_language} \"{target_translation}\"
reflète ce sens de rupture émotionnelle ou physique.";

/// Built-in examples for English, French, Italian, Spanish, German and Portuguese
pub fn builtin_examples() -> CalibrationSet {
    use ExampleKind::*;
    use PlaceholderSyntax::*;

    let mut examples = vec![
        Example::new(
            Basic,
            &[
                ("English", "Hello"),
                ("French", "Bonjour"),
                ("Italian", "Ciao"),
                ("Spanish", "Hola"),
                ("German", "Hallo"),
                ("Portuguese", "Olá"),
            ],
        ),
        Example::new(
            Basic,
            &[
                ("English", "Goodbye"),
                ("French", "Au revoir"),
                ("Italian", "Arrivederci"),
                ("Spanish", "Adiós"),
                ("German", "Auf Wiedersehen"),
                ("Portuguese", "Tchau"),
            ],
        ),
        Example::new(
            Ambiguous {
                original_language: "English".to_string(),
                context_language: "French".to_string(),
                explanation: EXPLANATION_EN_FR.to_string(),
            },
            &[
                ("English", "He gave her a ring."),
                ("French", "Il lui a passé un coup de fil."),
                ("Italian", "Le ha fatto una telefonata."),
                ("Spanish", "Le llamó por teléfono."),
                ("German", "Er hat sie angerufen."),
                ("Portuguese", "Ele telefonou-lhe."),
            ],
        ),
        Example::new(
            Ambiguous {
                original_language: "French".to_string(),
                context_language: "English".to_string(),
                explanation: EXPLANATION_FR_EN.to_string(),
            },
            &[
                ("French", "Elle s'est effondrée"),
                ("English", "She broke down"),
                ("Italian", "È crollata"),
                ("Spanish", "Ella se derrumbó"),
                ("German", "Sie brach zusammen"),
                ("Portuguese", "Ela desabou."),
            ],
        ),
        Example::new(
            Placeholder(NamedPercent),
            &[
                ("English", "%(follower_name)s has created a new %(followed_type)s: %(followed_object_name)s"),
                ("French", "%(follower_name)s a créé un nouveau %(followed_type)s: %(followed_object_name)s"),
                ("Italian", "%(follower_name)s ha creato un nuovo %(followed_type)s: %(followed_object_name)s"),
                ("Spanish", "%(follower_name)s ha creado un nuevo %(followed_type)s: %(followed_object_name)s"),
                ("German", "%(follower_name)s hat ein neues %(followed_type)s erstellt: %(followed_object_name)s"),
                ("Portuguese", "%(follower_name)s criou um novo %(followed_type)s: %(followed_object_name)s"),
            ],
        ),
        Example::new(
            Placeholder(Brace),
            &[
                ("English", "{follower_name} has created a new {followed_type}: {followed_object_name}"),
                ("French", "{follower_name} a créé un nouveau {followed_type}: {followed_object_name}"),
                ("Italian", "{follower_name} ha creato un nuovo {followed_type}: {followed_object_name}"),
                ("Spanish", "{follower_name} ha creado un nuevo {followed_type}: {followed_object_name}"),
                ("German", "{follower_name} hat ein neues {followed_type} erstellt: {followed_object_name}"),
                ("Portuguese", "{follower_name} criou um novo {followed_type}: {followed_object_name}"),
            ],
        ),
        Example::new(
            Placeholder(Positional),
            &[
                ("English", "%s has created a new %s: %s"),
                ("French", "%s a créé un nouveau %s: %s"),
                ("Italian", "%s ha creato un nuovo %s: %s"),
                ("Spanish", "%s ha creado un nuevo %s: %s"),
                ("German", "%s hat ein neues %s erstellt: %s"),
                ("Portuguese", "%s criou um novo %s: %s"),
            ],
        ),
        Example::new(
            Markup,
            &[
                ("English", "<b>Warning:</b> this action cannot be undone."),
                ("French", "<b>Attention :</b> cette action est irréversible."),
                ("Italian", "<b>Attenzione:</b> questa azione non può essere annullata."),
                ("Spanish", "<b>Advertencia:</b> esta acción no se puede deshacer."),
                ("German", "<b>Warnung:</b> Diese Aktion kann nicht rückgängig gemacht werden."),
                ("Portuguese", "<b>Aviso:</b> esta ação não pode ser desfeita."),
            ],
        ),
        Example::new(
            Markup,
            &[
                ("English", "Please <a href=\"/login\">sign in</a> to continue."),
                ("French", "Veuillez vous <a href=\"/login\">connecter</a> pour continuer."),
                ("Italian", "<a href=\"/login\">Accedi</a> per continuare."),
                ("Spanish", "<a href=\"/login\">Inicia sesión</a> para continuar."),
                ("German", "Bitte <a href=\"/login\">melde dich an</a>, um fortzufahren."),
                ("Portuguese", "<a href=\"/login\">Inicie sessão</a> para continuar."),
            ],
        ),
    ];
    examples.extend(supplementary_examples());
    CalibrationSet::new(examples)
}

fn supplementary_examples() -> Vec<Example> {
    let table: &[[&str; 6]] = &[
        // English, French, Italian, Spanish, German, Portuguese
        [
            "Save changes",
            "Enregistrer les modifications",
            "Salva modifiche",
            "Guardar cambios",
            "Änderungen speichern",
            "Salvar alterações",
        ],
        [
            "File not found",
            "Fichier introuvable",
            "File non trovato",
            "Archivo no encontrado",
            "Datei nicht gefunden",
            "Arquivo não encontrado",
        ],
        [
            "Are you sure you want to delete this item?",
            "Êtes-vous sûr de vouloir supprimer cet élément ?",
            "Sei sicuro di voler eliminare questo elemento?",
            "¿Seguro que quieres eliminar este elemento?",
            "Möchtest du dieses Element wirklich löschen?",
            "Tem certeza de que deseja excluir este item?",
        ],
        [
            "Your password has been changed.",
            "Votre mot de passe a été modifié.",
            "La tua password è stata modificata.",
            "Tu contraseña ha sido cambiada.",
            "Dein Passwort wurde geändert.",
            "Sua senha foi alterada.",
        ],
        ["Open", "Ouvrir", "Apri", "Abrir", "Öffnen", "Abrir"],
        ["Close", "Fermer", "Chiudi", "Cerrar", "Schließen", "Fechar"],
        [
            "Welcome back, %(username)s!",
            "Bon retour, %(username)s !",
            "Bentornato, %(username)s!",
            "¡Bienvenido de nuevo, %(username)s!",
            "Willkommen zurück, %(username)s!",
            "Bem-vindo de volta, %(username)s!",
        ],
        [
            "You have {count} unread messages.",
            "Vous avez {count} messages non lus.",
            "Hai {count} messaggi non letti.",
            "Tienes {count} mensajes sin leer.",
            "Du hast {count} ungelesene Nachrichten.",
            "Você tem {count} mensagens não lidas.",
        ],
        [
            "Last login: %s",
            "Dernière connexion : %s",
            "Ultimo accesso: %s",
            "Último inicio de sesión: %s",
            "Letzte Anmeldung: %s",
            "Último login: %s",
        ],
        [
            "Settings",
            "Paramètres",
            "Impostazioni",
            "Configuración",
            "Einstellungen",
            "Configurações",
        ],
    ];
    let languages = ["English", "French", "Italian", "Spanish", "German", "Portuguese"];

    table
        .iter()
        .map(|row| {
            let phrases: Vec<(&str, &str)> =
                languages.iter().copied().zip(row.iter().copied()).collect();
            Example::new(ExampleKind::Supplementary, &phrases)
        })
        .collect()
}
