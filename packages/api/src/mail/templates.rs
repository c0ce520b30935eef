//! HTML bodies for outbound mail. Kept as plain format! templates so the
//! bilingual copy stays greppable.

pub fn register(first_name: Option<&str>, redirect_url: &str) -> (String, String) {
    let greeting = first_name
        .map(|name| format!("Hi {},", name))
        .unwrap_or_else(|| "Hi,".to_string());

    let html = format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Account Confirmation</title>
</head>
<body style="margin: 0; padding: 0; font-family: -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; background-color: #f4f4f5; color: #18181b;">
    <table role="presentation" style="width: 100%; border-collapse: collapse;">
        <tr>
            <td style="padding: 40px 20px;">
                <table role="presentation" style="max-width: 560px; margin: 0 auto; background: #ffffff; border-radius: 12px; border: 1px solid #e4e4e7;">
                    <tr>
                        <td style="padding: 32px 40px; border-bottom: 1px solid #e4e4e7; text-align: center;">
                            <span style="font-size: 22px; font-weight: 700; color: #0f766e;">Tamreen</span>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 32px 40px;">
                            <p style="margin: 0 0 16px; font-size: 15px; line-height: 1.6;">{greeting}</p>
                            <p style="margin: 0 0 16px; font-size: 15px; line-height: 1.6;">
                                Welcome to Tamreen! Your account has been created and you can sign in right away.
                            </p>
                            <div style="text-align: center; margin: 28px 0;">
                                <a href="{redirect_url}" style="display: inline-block; background: #0f766e; color: #ffffff; text-decoration: none; font-size: 15px; font-weight: 600; padding: 12px 28px; border-radius: 8px;">
                                    Open Tamreen
                                </a>
                            </div>
                            <p style="margin: 0; font-size: 13px; color: #71717a;">
                                If you did not create this account, you can safely ignore this email.
                            </p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"##
    );

    ("Account Confirmation".to_string(), html)
}

pub fn forgot_password(first_name: Option<&str>, code: &str, redirect_url: &str) -> (String, String) {
    let greeting = first_name
        .map(|name| format!("Hi {},", name))
        .unwrap_or_else(|| "Hi,".to_string());
    let reset_url = format!("{}/reset-password?code={}", redirect_url, code);

    let html = format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Reset Your Password</title>
</head>
<body style="margin: 0; padding: 0; font-family: -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; background-color: #f4f4f5; color: #18181b;">
    <table role="presentation" style="width: 100%; border-collapse: collapse;">
        <tr>
            <td style="padding: 40px 20px;">
                <table role="presentation" style="max-width: 560px; margin: 0 auto; background: #ffffff; border-radius: 12px; border: 1px solid #e4e4e7;">
                    <tr>
                        <td style="padding: 32px 40px; border-bottom: 1px solid #e4e4e7; text-align: center;">
                            <span style="font-size: 22px; font-weight: 700; color: #0f766e;">Tamreen</span>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 32px 40px;">
                            <p style="margin: 0 0 16px; font-size: 15px; line-height: 1.6;">{greeting}</p>
                            <p style="margin: 0 0 16px; font-size: 15px; line-height: 1.6;">
                                We received a request to reset your password. Use the button below to choose a new one.
                            </p>
                            <div style="text-align: center; margin: 28px 0;">
                                <a href="{reset_url}" style="display: inline-block; background: #0f766e; color: #ffffff; text-decoration: none; font-size: 15px; font-weight: 600; padding: 12px 28px; border-radius: 8px;">
                                    Reset Password
                                </a>
                            </div>
                            <p style="margin: 0 0 8px; font-size: 13px; color: #71717a;">
                                Or paste this code into the app:
                                <code style="background: #f4f4f5; padding: 2px 6px; border-radius: 4px;">{code}</code>
                            </p>
                            <p style="margin: 0; font-size: 13px; color: #71717a;">
                                If you did not request a reset, no action is needed.
                            </p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"##
    );

    ("Reset Your Password".to_string(), html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_greets_by_name_when_known() {
        let (subject, html) = register(Some("Aya"), "https://app.example.com");
        assert_eq!(subject, "Account Confirmation");
        assert!(html.contains("Hi Aya,"));
        assert!(html.contains("https://app.example.com"));
    }

    #[test]
    fn forgot_password_embeds_code_and_link() {
        let (_, html) = forgot_password(None, "abc123", "https://app.example.com");
        assert!(html.contains("https://app.example.com/reset-password?code=abc123"));
        assert!(html.contains("abc123"));
        assert!(html.contains("Hi,"));
    }
}
