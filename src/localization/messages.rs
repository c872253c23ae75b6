use std::fmt;

/// supported languages for the landing page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Lang {
    #[default]
    En,
    Es,
    Pt,
    Fr,
}

impl Lang {
    pub const ALL: [Lang; 4] = [Lang::En, Lang::Es, Lang::Pt, Lang::Fr];

    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Es => "es",
            Lang::Pt => "pt",
            Lang::Fr => "fr",
        }
    }

    /// exact match against the supported set, used for query overrides and path prefixes
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// creates Lang from Telegram's language_code (e.g., "es-ES", "pt-br", "de")
    pub fn from_code(code: Option<&str>) -> Self {
        let code = match code {
            Some(code) => code.to_lowercase(),
            None => return Lang::default(),
        };

        if code.starts_with("es") {
            Lang::Es
        } else if code.starts_with("pt") {
            Lang::Pt
        } else if code.starts_with("fr") {
            Lang::Fr
        } else {
            Lang::En
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Lang::En => "English",
            Lang::Es => "Español",
            Lang::Pt => "Português",
            Lang::Fr => "Français",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Error messages
// =============================================================================

impl Lang {
    pub fn error_generic(&self) -> &'static str {
        match self {
            Lang::En => "Something went wrong. Please go back and try again.",
            Lang::Es => "Algo salió mal. Vuelve atrás e inténtalo de nuevo.",
            Lang::Pt => "Algo deu errado. Volte e tente novamente.",
            Lang::Fr => "Une erreur s'est produite. Revenez en arrière et réessayez.",
        }
    }

    pub fn error_missing_tg(&self) -> &'static str {
        match self {
            Lang::En => "Open this page from Telegram to claim your reward.",
            Lang::Es => "Abre esta página desde Telegram para reclamar tu recompensa.",
            Lang::Pt => "Abra esta página pelo Telegram para resgatar sua recompensa.",
            Lang::Fr => "Ouvrez cette page depuis Telegram pour réclamer votre récompense.",
        }
    }

    pub fn error_network(&self) -> &'static str {
        match self {
            Lang::En => "Network error. Please check your connection and try again.",
            Lang::Es => "Error de red. Comprueba tu conexión e inténtalo de nuevo.",
            Lang::Pt => "Erro de rede. Verifique sua conexão e tente novamente.",
            Lang::Fr => "Erreur réseau. Vérifiez votre connexion et réessayez.",
        }
    }

    pub fn error_missing_params(&self) -> &'static str {
        match self {
            Lang::En => "Some required information was missing. Please try again from Telegram.",
            Lang::Es => "Faltan datos necesarios. Inténtalo de nuevo desde Telegram.",
            Lang::Pt => "Faltam informações necessárias. Tente novamente pelo Telegram.",
            Lang::Fr => "Des informations requises manquent. Réessayez depuis Telegram.",
        }
    }

    pub fn error_already_own_77(&self) -> &'static str {
        match self {
            Lang::En => "You already own this reward.",
            Lang::Es => "Ya tienes esta recompensa.",
            Lang::Pt => "Você já possui esta recompensa.",
            Lang::Fr => "Vous possédez déjà cette récompense.",
        }
    }

    /// maps a server reason code to a message; unknown codes get the generic one
    pub fn reason_message(&self, reason: &str) -> &'static str {
        match reason {
            "MISSING_PARAMS" => self.error_missing_params(),
            "ALREADY_OWN_77" => self.error_already_own_77(),
            _ => self.error_generic(),
        }
    }
}

// =============================================================================
// Landing page
// =============================================================================

impl Lang {
    pub fn game_headline(&self) -> &'static str {
        match self {
            Lang::En => "The awakening is coming",
            Lang::Es => "El despertar se acerca",
            Lang::Pt => "O despertar está chegando",
            Lang::Fr => "L'éveil approche",
        }
    }

    pub fn game_cta(&self) -> &'static str {
        match self {
            Lang::En => "Claim my reward",
            Lang::Es => "Reclamar mi recompensa",
            Lang::Pt => "Resgatar minha recompensa",
            Lang::Fr => "Réclamer ma récompense",
        }
    }

    pub fn countdown_expired(&self) -> &'static str {
        match self {
            Lang::En => "The game is live!",
            Lang::Es => "¡El juego ya está disponible!",
            Lang::Pt => "O jogo já está no ar!",
            Lang::Fr => "Le jeu est lancé !",
        }
    }

    pub fn countdown_labels(&self) -> [&'static str; 4] {
        match self {
            Lang::En => ["days", "hours", "min", "sec"],
            Lang::Es => ["días", "horas", "min", "seg"],
            Lang::Pt => ["dias", "horas", "min", "seg"],
            Lang::Fr => ["jours", "heures", "min", "sec"],
        }
    }
}

// =============================================================================
// Confirmation page
// =============================================================================

impl Lang {
    pub fn thank_title_ok(&self) -> &'static str {
        match self {
            Lang::En => "Your rewards are ready!",
            Lang::Es => "¡Tus recompensas están listas!",
            Lang::Pt => "Suas recompensas estão prontas!",
            Lang::Fr => "Vos récompenses sont prêtes !",
        }
    }

    pub fn thank_sub_ok(&self) -> &'static str {
        match self {
            Lang::En => "They will be waiting in your inventory on launch day.",
            Lang::Es => "Te esperarán en tu inventario el día del lanzamiento.",
            Lang::Pt => "Elas estarão no seu inventário no dia do lançamento.",
            Lang::Fr => "Elles vous attendront dans votre inventaire le jour du lancement.",
        }
    }

    pub fn thank_title_error(&self) -> &'static str {
        match self {
            Lang::En => "We couldn't claim your reward",
            Lang::Es => "No pudimos reclamar tu recompensa",
            Lang::Pt => "Não conseguimos resgatar sua recompensa",
            Lang::Fr => "Impossible de réclamer votre récompense",
        }
    }

    pub fn thank_retry(&self) -> &'static str {
        match self {
            Lang::En => "Try again",
            Lang::Es => "Intentar de nuevo",
            Lang::Pt => "Tentar novamente",
            Lang::Fr => "Réessayer",
        }
    }

    pub fn thank_open_bot(&self) -> &'static str {
        match self {
            Lang::En => "Open the bot",
            Lang::Es => "Abrir el bot",
            Lang::Pt => "Abrir o bot",
            Lang::Fr => "Ouvrir le bot",
        }
    }

    pub fn test_mode_banner(&self) -> &'static str {
        "TEST MODE - This site is not indexed by search engines"
    }
}
