pub mod package_file;
