mod helpers;
mod tests_failures;
