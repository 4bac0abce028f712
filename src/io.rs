use std::path::Path;
use std::fs::File;
use std::io::{BufReader, BufRead, Write};

use tracing::*;

use crate::*;

/// Converts a structure into a string
pub trait PrettyFormatter<T> {
    fn format_pretty( &self, object: &T ) -> String;
}

/// Reads a transactional file (FIMI/DAT): one transaction per line, items separated by whitespace.
/// Blank lines and `#` comments are skipped.
pub fn read_data( path: &str ) -> Result<Vec<Itemvec>, MineError> {
    let file = File::open( Path::new( path )).map_err( |source| MineError::Io{ path: path.to_string(), source })?;
    let reader = BufReader::new( file );
    let mut transactions = Vec::new();
    for (number, line) in reader.lines().enumerate() {
	let line = line.map_err( |source| MineError::Io{ path: path.to_string(), source })?;
	if let Some( transaction ) = parse_fimi_line( &line, number + 1 )? {
	    transactions.push( transaction );
	}
    }
    debug!( "read {} transactions from {path}", transactions.len() );
    Ok( transactions )
}

/// Reads a file straight into a database
pub fn read_database( path: &str ) -> Result<TransactionalDatabase, MineError> {
    TransactionalDatabase::from_transactions( read_data( path )? )
}

/// Parses one line. None for lines that carry no transaction.
pub fn parse_fimi_line( line: &str, number: usize ) -> Result<Option<Itemvec>, MineError> {
    let content = line.trim();
    if content.is_empty() || content.starts_with( '#' ) {
	return Ok( None );
    }
    parse_fimi_to_vec( content, number ).map( Some )
}

/// Parses whitespace separated numbers into a vector
pub fn parse_fimi_to_vec( line: &str, number: usize ) -> Result<Itemvec, MineError> {
    line.split_whitespace()
	.map( |chunk| chunk.parse::<Item>().map_err( |err| MineError::DataFormat {
	    line: number,
	    token: chunk.to_string(),
	    reason: err.to_string(),
	}))
	.collect()
}

/// Creates a fimi string from an iterator over items
pub fn produce_fimi<I: Iterator<Item = Item>>( items: I, left_delimiter: &str, separator: &str, right_delimiter: &str ) -> String {
    let body: Vec<String> = items.map( |item| item.to_string() ).collect();
    let mut fimi = String::new();
    fimi.push_str( left_delimiter );
    fimi.push_str( &body.join( separator ));
    fimi.push_str( right_delimiter );
    fimi
}

/// Writes a serializeable value as JSON to a file
pub fn write_json<M: serde::Serialize>( value: &M, path: &str ) -> Result<(), MineError> {
    let json = serde_json::to_string_pretty( value )?;
    let mut file = File::create( Path::new( path )).map_err( |source| MineError::Io{ path: path.to_string(), source })?;
    write!( file, "{}", json ).map_err( |source| MineError::Io{ path: path.to_string(), source })
}

/// Exports mined patterns
pub fn write_patterns( patterns: &[Pattern], path: &str ) -> Result<(), MineError> {
    info!( "writing {} patterns to {path}", patterns.len() );
    write_json( &patterns, path )
}

/// Prints patterns as `[1, 3], freq=2`
pub struct PatternFormatter {
    show_length: bool,
}

impl PatternFormatter {
    pub fn new() -> PatternFormatter {
	PatternFormatter{ show_length: false }
    }

    pub fn show_length( &mut self ) { self.show_length = true; }
}

impl Default for PatternFormatter {
    fn default() -> Self { PatternFormatter::new() }
}

impl PrettyFormatter<Pattern> for PatternFormatter {
    fn format_pretty( &self, pattern: &Pattern ) -> String {
	let items = produce_fimi( pattern.items.iter().copied(), "[", ", ", "]" );
	if self.show_length {
	    format!( "{items}, freq={}, length={}", pattern.frequency(), pattern.length() )
	} else {
	    format!( "{items}, freq={}", pattern.frequency() )
	}
    }
}

#[cfg(test)]
mod test {
    use std::env;

    use super::*;

    fn scratch_file( name: &str, content: &str ) -> String {
	let path = env::temp_dir().join( format!( "mismine-{}-{name}", std::process::id() ));
	std::fs::write( &path, content ).unwrap();
	path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_read_data() {
	let path = scratch_file( "toy.dat", "# toy\n0 1\n0 2\n\n1 2 3\n0  3 \n" );
	let transactions = read_data( &path ).unwrap();
	assert_eq!( transactions, vec!( vec!( 0, 1 ), vec!( 0, 2 ), vec!( 1, 2, 3 ), vec!( 0, 3 )));

	let database = read_database( &path ).unwrap();
	assert_eq!( database.nb_items(), 4 );
	assert_eq!( database.nb_transactions(), 4 );
    }

    #[test]
    fn test_reports_offending_token() {
	let path = scratch_file( "broken.dat", "1 2\n3 x4\n" );
	match read_data( &path ) {
	    Err( MineError::DataFormat{ line, token, .. } ) => {
		assert_eq!( line, 2 );
		assert_eq!( token, "x4" );
	    },
	    other => panic!( "expected a format error, got {other:?}" ),
	}
	assert!( parse_fimi_to_vec( "-1", 1 ).is_err() );
    }

    #[test]
    fn test_missing_and_empty_files() {
	assert!( matches!( read_data( "/nonexistent/mismine.dat" ), Err( MineError::Io{ .. } )));
	let path = scratch_file( "empty.dat", "\n# nothing\n" );
	assert!( matches!( read_database( &path ), Err( MineError::EmptyDatabase )));
    }

    #[test]
    fn test_pattern_output() {
	let pattern = Pattern{ items: vec!( 1, 3 ), measures: vec!( 2, 2 ) };
	let mut formatter = PatternFormatter::new();
	assert_eq!( formatter.format_pretty( &pattern ), "[1, 3], freq=2" );
	formatter.show_length();
	assert_eq!( formatter.format_pretty( &pattern ), "[1, 3], freq=2, length=2" );
	assert_eq!( produce_fimi( vec!( 4, 5 ).into_iter(), "", " ", "" ), "4 5" );

	let path = scratch_file( "patterns.json", "" );
	write_patterns( &[pattern], &path ).unwrap();
	let written: serde_json::Value = serde_json::from_str( &std::fs::read_to_string( &path ).unwrap() ).unwrap();
	assert_eq!( written[0]["items"], serde_json::json!( [1, 3] ));
	assert_eq!( written[0]["measures"][0], 2 );
    }
}
