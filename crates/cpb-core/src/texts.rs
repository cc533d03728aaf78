//! Fixed reply texts.

/// English then Italian usage text, MarkdownV2-escaped.
pub const HELP_MARKDOWN_V2: &str = concat!(
    "🇬🇧 Welcome to the `cybersecurity\\-polito` GitHub organization bot\\!\n",
    "To join the organization, please link your student email \\(sXXXXXX@studenti\\.polito\\.it\\) ",
    "to your existing GitHub account and use the /invite command to send your email in a message\\.\n",
    "Available commands:\n",
    "/start \\- Start interacting with the bot\n",
    "/help \\- Show this help message\n",
    "/invite \\- Request an invitation to the organization through your student email",
    "\n\n",
    "🇮🇹 Benvenuto nel bot dell'organizzazione GitHub `cybersecurity\\-polito`\\!\n",
    "Per unirti all'organizzazione, collega la tua email studentesca \\(sXXXXXX@studenti\\.polito\\.it\\) ",
    "al tuo account GitHub esistente e utilizza il comando /invite per inviare la tua email in un messaggio\\.\n",
    "Comandi disponibili:\n",
    "/start \\- Inizia a interagire con il bot\n",
    "/help \\- Mostra questo messaggio di aiuto\n",
    "/invite \\- Richiedi un invito all'organizzazione tramite la tua email studentesca",
);

pub const INVALID_EMAIL: &str = "Email address is invalid. Format:\n/invite sXXXXXX@studenti.polito.it";

pub const INVALID_COMMAND: &str = "Invalid command. Please use /help for more information.";

pub fn invitation_sent(email: &str) -> String {
    format!("Invitation sent to {email}.")
}

pub fn accept_instructions(invitation_page_url: &str) -> String {
    format!("Please check your email or {invitation_page_url} to accept the invitation.")
}

pub fn invitation_failed(email: &str) -> String {
    format!("Error sending invitation to {email}.\nPlease contact the administrator.")
}
