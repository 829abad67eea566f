pub mod google_translate;
