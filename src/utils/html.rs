use ammonia;

/// Clean lesson HTML using the ammonia whitelist.
///
/// Safe formatting tags (<b>, <p>, <img>) survive; <script>, <iframe> and
/// event-handler attributes are stripped along with their content.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
