use std::fmt;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::*;

use crate::*;

pub mod cover;

/// Original item identifier as it appears in the data source.
pub type Item = usize;
/// Dense position of an item in `[0, nb_items)`.
pub type ItemIndex = usize;
pub type Itemvec = Vec<Item>;
pub type Count = u64;
/// Set of transaction indices.
pub type Cover = bit_set::BitSet;

/// Transactions stored horizontally plus a vertical cover per item.
/// Immutable once built, so a single instance is shared by every node of a search.
pub struct TransactionalDatabase {
    /// dense index -> original identifier
    items: Vec<Item>,
    /// original identifier -> dense index
    index_of: FxHashMap<Item, ItemIndex>,
    /// transactions in original identifiers, duplicates removed and sorted
    transactions: Vec<Itemvec>,
    /// invariant: bit t of vertical_cover[i] is set iff items[i] occurs in transactions[t]
    vertical_cover: Vec<Cover>,
    frequencies: Vec<Count>,
}

impl TransactionalDatabase {

    /// Builds a database over the declared items. Item order fixes the dense indices.
    pub fn new( items: Vec<Item>, transactions: Vec<Itemvec> ) -> Result<TransactionalDatabase, MineError> {
	if transactions.is_empty() {
	    return Err( MineError::EmptyDatabase );
	}

	let mut index_of: FxHashMap<Item, ItemIndex> = FxHashMap::default();
	index_of.reserve( items.len() );
	for (index, item) in items.iter().enumerate() {
	    if index_of.insert( *item, index ).is_some() {
		return Err( MineError::invalid( "items", item, "item declared twice" ));
	    }
	}

	let transactions: Vec<Itemvec> = transactions.into_iter()
	    .map( normalize_transaction )
	    .collect();

	// translate to dense indices, rejecting anything that was not declared
	let dense: Vec<Vec<ItemIndex>> = transactions.par_iter()
	    .enumerate()
	    .map( |(t, transaction)| {
		transaction.iter()
		    .map( |item| index_of.get( item ).copied()
			  .ok_or( MineError::UndefinedItem{ transaction: t, item: *item }))
		    .collect::<Result<Vec<ItemIndex>, MineError>>()
	    })
	    .collect::<Result<Vec<_>, MineError>>()?;

	let nb_transactions = transactions.len();
	let mut vertical_cover = vec![ Cover::with_capacity( nb_transactions ); items.len() ];
	for (t, transaction) in dense.iter().enumerate() {
	    for index in transaction {
		vertical_cover[ *index ].insert( t );
	    }
	}
	let frequencies: Vec<Count> = vertical_cover.par_iter()
	    .map( |cover| cover.len() as Count )
	    .collect();

	debug!( "built vertical representation for {} items over {} transactions", items.len(), nb_transactions );

	Ok( TransactionalDatabase {
	    items,
	    index_of,
	    transactions,
	    vertical_cover,
	    frequencies,
	})
    }

    /// Builds a database whose items are every identifier observed, indexed in ascending order.
    pub fn from_transactions( transactions: Vec<Itemvec> ) -> Result<TransactionalDatabase, MineError> {
	let mut items: Itemvec = transactions.iter().flatten().copied().collect();
	items.sort_unstable();
	items.dedup();
	TransactionalDatabase::new( items, transactions )
    }

    pub fn nb_items( &self ) -> usize {
	self.items.len()
    }

    pub fn nb_transactions( &self ) -> usize {
	self.transactions.len()
    }

    /// Original identifiers ordered by dense index
    pub fn items( &self ) -> &[Item] {
	&self.items
    }

    /// Original identifier of the item at a dense index
    pub fn item( &self, index: ItemIndex ) -> Item {
	self.items[ index ]
    }

    pub fn index_of( &self, item: Item ) -> Option<ItemIndex> {
	self.index_of.get( &item ).copied()
    }

    pub fn transactions( &self ) -> &[Itemvec] {
	&self.transactions
    }

    /// Number of transactions containing the item
    pub fn frequency( &self, index: ItemIndex ) -> Count {
	self.frequencies[ index ]
    }

    pub fn frequencies( &self ) -> &[Count] {
	&self.frequencies
    }

    pub fn cover( &self, index: ItemIndex ) -> &Cover {
	&self.vertical_cover[ index ]
    }

    pub fn covers( &self ) -> &[Cover] {
	&self.vertical_cover
    }

    /// Transactions containing every listed item; all transactions for an empty list.
    pub fn cover_of<I>( &self, indices: I ) -> Cover where I: IntoIterator<Item = ItemIndex> {
	cover::cover_of( &self.vertical_cover, self.nb_transactions(), indices )
    }

    pub fn full_cover( &self ) -> Cover {
	cover::full_cover( self.nb_transactions() )
    }

    /// Translates dense indices back into sorted original identifiers
    pub fn to_items<I>( &self, indices: I ) -> Itemvec where I: IntoIterator<Item = ItemIndex> {
	let mut items: Itemvec = indices.into_iter().map( |index| self.item( index )).collect();
	items.sort_unstable();
	items
    }
}

fn normalize_transaction( mut transaction: Itemvec ) -> Itemvec {
    transaction.sort_unstable();
    transaction.dedup();
    transaction
}

impl fmt::Debug for TransactionalDatabase {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
	f.debug_struct( "TransactionalDatabase" )
	    .field( "nb_items", &self.nb_items() )
	    .field( "nb_transactions", &self.nb_transactions() )
	    .finish()
    }
}

impl Loggable for TransactionalDatabase {
    fn log( &self, message: &str, level: Level ) {
	let cells = (self.nb_items() * self.nb_transactions()).max( 1 );
	let occurrences: Count = self.frequencies.iter().sum();
	let density = occurrences as f64 / cells as f64;
	log_at( level, &format!( "{message}: {} items, {} transactions, density {density:.3}",
				 self.nb_items(), self.nb_transactions() ));
    }
}
