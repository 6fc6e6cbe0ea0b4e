mod downloads_test;
mod related_test;
mod trending_test;
