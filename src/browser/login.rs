//! Google login flow for filmweb.pl.
//!
//! Strictly best effort: every stage tolerates missing elements and
//! failures, because the persistent profile usually carries a live session
//! and the flow only has to top it up. Nothing here can fail the run.

use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::browser::BrowserSession;
use crate::infrastructure::PageDriver;

const LOGIN_TRIGGER_JS: &str = r#"(function() {
    const texts = ['Zaloguj się', 'Zaloguj'];
    const clickables = Array.from(document.querySelectorAll("a, button, [role='button']"));
    let target = clickables.find(el => {
        const t = (el.textContent || '').trim();
        return texts.some(x => t === x || t.includes(x));
    });
    if (!target) target = document.querySelector("[data-test='login'], [data-testid='login']");
    if (!target) target = document.querySelector("a[href*='login']");
    if (!target) return false;
    target.click();
    return true;
})()"#;

const GOOGLE_PROVIDER_JS: &str = r#"(function() {
    const clickables = Array.from(document.querySelectorAll("a, button, [role='button'], [data-provider]"));
    let target = clickables.find(el => (el.textContent || '').includes('Google'));
    if (!target) target = document.querySelector("[data-test*='google'], [data-provider='google']");
    if (!target) target = document.querySelector("[href*='google']");
    if (!target) return false;
    target.click();
    return true;
})()"#;

/// Log in to filmweb via Google, reusing the persistent profile session.
///
/// `driver` must already be on a filmweb page.
pub async fn login_via_google(session: &BrowserSession, driver: &PageDriver, email: &str) {
    info!("🔐 login flow (best effort, account: {})", mask(email));

    match driver.eval_as::<bool>(LOGIN_TRIGGER_JS).await {
        Ok(true) => debug!("login trigger clicked"),
        Ok(false) => debug!("no login trigger found, maybe already logged in"),
        Err(e) => debug!("login trigger probe failed: {}", e),
    }
    sleep(Duration::from_secs(1)).await;

    match driver.eval_as::<bool>(GOOGLE_PROVIDER_JS).await {
        Ok(true) => debug!("google provider clicked"),
        Ok(false) => debug!("no google provider control found"),
        Err(e) => debug!("google provider probe failed: {}", e),
    }
    // the provider click may open the chooser in a popup
    sleep(Duration::from_secs(4)).await;

    match google_page(session).await {
        Some(popup) => {
            if let Err(e) = pick_account(&popup, email).await {
                debug!("account chooser interaction failed: {}", e);
            }
        }
        None => {
            if let Err(e) = pick_account(driver, email).await {
                debug!("account chooser interaction failed: {}", e);
            }
        }
    }

    // wait for the redirect back to filmweb
    let deadline = tokio::time::Instant::now() + Duration::from_secs(30);
    loop {
        if driver.url().await.contains("filmweb.pl") {
            break;
        }
        if tokio::time::Instant::now() >= deadline {
            warn!("⚠️ not back on filmweb after the login window, continuing anyway");
            break;
        }
        sleep(Duration::from_millis(500)).await;
    }
    sleep(Duration::from_secs(2)).await;
}

/// Find an open Google accounts tab, if the provider click spawned one.
async fn google_page(session: &BrowserSession) -> Option<PageDriver> {
    let pages = session.browser().pages().await.ok()?;
    for page in pages {
        if let Ok(Some(url)) = page.url().await {
            if url.contains("accounts.google") {
                return Some(PageDriver::new(page));
            }
        }
    }
    None
}

/// Click the matching account tile, or type the address into the e-mail
/// field and submit it.
async fn pick_account(driver: &PageDriver, email: &str) -> Result<bool> {
    let email_json = serde_json::to_string(email)?;
    let js = format!(
        r#"(function() {{
            const email = {email_json};
            const tile = document.querySelector("[data-identifier=" + JSON.stringify(email) + "]");
            if (tile) {{ tile.click(); return true; }}
            const candidates = Array.from(document.querySelectorAll('li, div[role="link"]'));
            const byText = candidates.find(el => (el.textContent || '').includes(email));
            if (byText) {{ byText.click(); return true; }}
            const input = document.querySelector("input[type='email']");
            if (!input) return false;
            input.focus();
            input.value = email;
            input.dispatchEvent(new Event('input', {{ bubbles: true }}));
            input.dispatchEvent(new KeyboardEvent('keydown', {{ key: 'Enter', code: 'Enter', keyCode: 13, bubbles: true }}));
            return true;
        }})()"#
    );
    driver.eval_as::<bool>(js).await
}

/// Keep the mailbox name out of the logs.
fn mask(email: &str) -> String {
    match email.split_once('@') {
        Some((_, domain)) => format!("***@{}", domain),
        None if email.is_empty() => "<unset>".to_string(),
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_hides_the_mailbox_name() {
        assert_eq!(mask("user@gmail.com"), "***@gmail.com");
        assert_eq!(mask(""), "<unset>");
        assert_eq!(mask("mail"), "***");
    }
}
