/// Clean admin-authored text before it is stored.
///
/// Whitelist-based: safe inline markup survives, `<script>`/`<iframe>` and
/// event-handler attributes are stripped. Content is served back to browsers,
/// so this is applied to every free-text field an admin can write.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
