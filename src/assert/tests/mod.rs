mod helpers;

mod tests_raise;
